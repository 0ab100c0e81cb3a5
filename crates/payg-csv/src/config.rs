//! Batch configuration

use std::path::{Path, PathBuf};

use payg_core::Period;
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, Result};

/// Batch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory receiving one CSV file per device
    pub output_dir: PathBuf,

    /// Short names of the periods laid out as columns; empty means every
    /// period with a counter progression
    pub periods: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            periods: Vec::new(),
        }
    }
}

impl BatchConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the configured column periods, in ascending id order
    pub fn resolve_periods(&self) -> Result<Vec<&'static Period>> {
        if self.periods.is_empty() {
            return Ok(Period::all()
                .iter()
                .filter(|period| !period.is_infinite())
                .collect());
        }

        let mut periods = Vec::with_capacity(self.periods.len());
        for name in &self.periods {
            let period = Period::resolve(name)?;
            if period.is_infinite() {
                return Err(BatchError::Config(format!(
                    "period ‘{}’ has no counter progression and cannot be a matrix column",
                    name
                )));
            }
            periods.push(period);
        }
        periods.sort();
        periods.dedup();
        Ok(periods)
    }
}
