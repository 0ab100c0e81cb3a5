//! Batch matrix building
//!
//! Entries are grouped by device id in order of first appearance. A device
//! listed again with a new key gets another matrix appended; listing the same
//! key twice changes nothing. Everything is built in memory so a batch is
//! rejected as a whole before any file exists.

use std::collections::HashMap;

use payg_core::{CodeDeriver, HmacSha1, KeyedHash, Period, SecretKey};
use tracing::debug;

use crate::codec::DeviceBatchEntry;
use crate::error::{BatchError, Result};
use crate::matrix::{check_columns, CodeMatrix};
use crate::output::FileId;

/// All codes generated for one device
#[derive(Debug, Clone)]
pub struct DeviceCodes {
    device_id: String,
    file_id: FileId,
    matrices: Vec<CodeMatrix>,
}

impl DeviceCodes {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Stable identifier naming the device's output file
    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    /// One matrix per distinct key, in batch order
    pub fn matrices(&self) -> &[CodeMatrix] {
        &self.matrices
    }
}

/// Builds per-device code matrices from a batch
#[derive(Debug, Clone)]
pub struct BatchMatrixBuilder<H = HmacSha1> {
    deriver: CodeDeriver<H>,
    periods: Vec<&'static Period>,
}

impl BatchMatrixBuilder {
    /// Builder laying out `periods` as columns
    pub fn new(periods: Vec<&'static Period>) -> Result<Self> {
        Self::with_deriver(CodeDeriver::new(), periods)
    }
}

impl<H: KeyedHash> BatchMatrixBuilder<H> {
    /// Builder using a specific deriver
    pub fn with_deriver(deriver: CodeDeriver<H>, periods: Vec<&'static Period>) -> Result<Self> {
        check_columns(&periods)?;
        Ok(Self { deriver, periods })
    }

    /// Column periods
    pub fn periods(&self) -> &[&'static Period] {
        &self.periods
    }

    /// Build one [`DeviceCodes`] per distinct device id
    pub fn build(&self, entries: &[DeviceBatchEntry]) -> Result<Vec<DeviceCodes>> {
        let mut groups: Vec<(&str, Vec<&SecretKey>)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for entry in entries {
            let slot = *index.entry(entry.device_id.as_str()).or_insert_with(|| {
                groups.push((entry.device_id.as_str(), Vec::new()));
                groups.len() - 1
            });
            let keys = &mut groups[slot].1;
            if keys.contains(&&entry.key) {
                debug!(device_id = %entry.device_id, line = entry.line, "skipping repeated key");
                continue;
            }
            keys.push(&entry.key);
        }

        let mut owners: HashMap<FileId, &str> = HashMap::new();
        let mut devices = Vec::with_capacity(groups.len());

        for (device_id, keys) in groups {
            let file_id = FileId::from_device_id(device_id);
            if let Some(other) = owners.insert(file_id, device_id) {
                return Err(BatchError::Format(format!(
                    "device ids ‘{}’ and ‘{}’ map to the same output file {}",
                    other,
                    device_id,
                    file_id.file_name()
                )));
            }

            let matrices = keys
                .into_iter()
                .map(|key| CodeMatrix::build(&self.deriver, key, &self.periods))
                .collect::<Result<Vec<_>>>()?;

            debug!(
                device_id,
                file_id = %file_id,
                matrices = matrices.len(),
                "built device codes"
            );

            devices.push(DeviceCodes {
                device_id: device_id.to_string(),
                file_id,
                matrices,
            });
        }
        Ok(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(device_id: &str, key: &str, line: u64) -> DeviceBatchEntry {
        DeviceBatchEntry {
            device_id: device_id.to_string(),
            key: SecretKey::new(key.as_bytes().to_vec()).unwrap(),
            line,
        }
    }

    fn builder() -> BatchMatrixBuilder {
        BatchMatrixBuilder::new(vec![
            Period::resolve("1d").unwrap(),
            Period::resolve("7d").unwrap(),
        ])
        .unwrap()
    }

    const KEY_A: &str = "first key for the device, long enough to pass the minimum length check";
    const KEY_B: &str = "second key for the device, long enough to pass the minimum length check";

    #[test]
    fn test_groups_by_device_in_first_seen_order() {
        let entries = vec![
            entry("8AF5DA70", KEY_A, 2),
            entry("3F0A1564", KEY_A, 3),
            entry("8AF5DA70", KEY_B, 4),
        ];
        let devices = builder().build(&entries).unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].device_id(), "8AF5DA70");
        assert_eq!(devices[0].matrices().len(), 2);
        assert_eq!(devices[1].device_id(), "3F0A1564");
        assert_eq!(devices[1].matrices().len(), 1);
    }

    #[test]
    fn test_repeated_key_collapses() {
        let entries = vec![entry("DEV", KEY_A, 2), entry("DEV", KEY_A, 3)];
        let devices = builder().build(&entries).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].matrices().len(), 1);
    }

    #[test]
    fn test_matrix_per_key_uses_that_key() {
        let entries = vec![entry("DEV", KEY_A, 2), entry("DEV", KEY_B, 3)];
        let devices = builder().build(&entries).unwrap();
        let matrices = devices[0].matrices();

        assert_ne!(matrices[0], matrices[1]);
        for matrix in matrices {
            assert_eq!(matrix.row_count(), 256);
            assert_eq!(matrix.column_count(), 2);
            matrix.check().unwrap();
        }
    }

    #[test]
    fn test_file_ids_are_stable() {
        let entries = vec![entry("3F0A1564", KEY_A, 2)];
        let first = builder().build(&entries).unwrap();
        let second = builder().build(&entries).unwrap();
        assert_eq!(first[0].file_id(), second[0].file_id());
        assert_eq!(first[0].file_id(), FileId::from_device_id("3F0A1564"));
    }

    #[test]
    fn test_empty_batch() {
        assert!(builder().build(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_infinite_column() {
        let result = BatchMatrixBuilder::new(vec![
            Period::resolve("1d").unwrap(),
            Period::resolve("infinite").unwrap(),
        ]);
        assert!(matches!(result, Err(BatchError::Config(_))));
    }
}
