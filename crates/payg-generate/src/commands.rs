//! Command implementations

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use payg_core::{parse_counter, CodeDeriver, CounterSelection, Period, SecretKey};
use thiserror::Error;
use tracing::debug;

/// Generate one or more pay as you go codes
#[derive(Parser, Debug)]
#[command(name = "payg-generate")]
#[command(about = "Generate one or more pay as you go codes")]
#[command(override_usage = "payg-generate [OPTIONS] KEY-FILENAME PERIOD [COUNTER]")]
#[command(version)]
pub struct Cli {
    /// Only print error messages
    #[arg(short, long)]
    pub quiet: bool,

    /// List the available periods
    #[arg(short = 'l', long)]
    pub list_periods: bool,

    /// KEY-FILENAME PERIOD [COUNTER]
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Process exit statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Success
    Ok = 0,
    /// Bad command line, unreadable key, unknown period or counter
    InvalidOptions = 1,
    /// Generation failed, e.g. the key is too weak
    Failed = 2,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Option parsing failed: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Core(#[from] payg_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CommandError::Usage(_) => ExitStatus::InvalidOptions,
            CommandError::Core(e) if e.is_key_strength() => ExitStatus::Failed,
            CommandError::Core(payg_core::Error::Mac(_)) => ExitStatus::Failed,
            CommandError::Core(_) => ExitStatus::InvalidOptions,
            CommandError::Io(_) => ExitStatus::Failed,
        }
    }
}

/// Run the command, writing results to `out`
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CommandError> {
    if cli.list_periods {
        return list_periods(cli.quiet, out);
    }

    let (key_filename, period_name, counter_text) = match cli.args.as_slice() {
        [key, period] => (key, period, None),
        [key, period, counter] => (key, period, Some(counter)),
        [] | [_] => return Err(CommandError::Usage("A KEY-FILENAME and PERIOD are required")),
        _ => return Err(CommandError::Usage("Too many arguments provided")),
    };

    let period = Period::resolve(period_name)?;
    let key = SecretKey::load(Path::new(key_filename))?;
    let selection = match counter_text {
        Some(text) => CounterSelection::Single(parse_counter(text)?),
        None => CounterSelection::All,
    };

    debug!(period = %period, ?selection, "generating codes");

    let codes = selection.codes(&CodeDeriver::new(), &key, period)?;
    for code in codes {
        writeln!(out, "{}", code)?;
    }
    Ok(())
}

/// Print the period catalogue
pub fn list_periods<W: Write>(quiet: bool, out: &mut W) -> Result<(), CommandError> {
    if !quiet {
        writeln!(out, "Available periods:")?;
    }
    for period in Period::all() {
        if quiet {
            writeln!(out, "{}", period.name())?;
        } else {
            writeln!(out, " • {} — {}", period.name(), period.label())?;
        }
    }
    Ok(())
}
