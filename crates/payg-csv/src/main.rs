//! PAYG CSV - generate code matrices for a batch of devices

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payg_csv::{run_batch, BatchConfig, BatchError};

const INPUT_FORMAT: &str = "\
Input format:
  A CSV file whose first line is the header `device_id,key`, followed by one
  device per line. The key is the raw shared secret of the device and must be
  at least 64 bytes long; quote it if it contains commas or line breaks.

  device_id,key
  3F0A1564,hello this has to be at least 64 bytes long so I am going to keep on typing.

  Records written by the provisioning tool are accepted as well:

  device_id,code1,code2,code3,key

Output:
  One file per device, named by the first 8 hex digits of SHA-256(device_id),
  e.g. 1A2B3C4D.csv. The header lists the period labels; each row holds the
  codes for one counter, every code prefixed with ' so spreadsheets keep the
  leading zeros.";

/// PAYG CSV - per-device code matrices
#[derive(Parser)]
#[command(name = "payg-csv")]
#[command(about = "Generate pay as you go code matrices for a batch of devices")]
#[command(version)]
#[command(after_help = INPUT_FORMAT)]
struct Cli {
    /// CSV file of device ids and keys
    #[arg(value_name = "ACCT_KEY_CSV_FILE")]
    batch_file: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving the per-device files (overrides the configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn run(cli: &Cli) -> anyhow::Result<Vec<PathBuf>> {
    let mut config = match &cli.config {
        Some(path) => BatchConfig::load(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => BatchConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }

    let file = File::open(&cli.batch_file)
        .with_context(|| format!("failed to read key file {}", cli.batch_file.display()))?;

    let written = run_batch(BufReader::new(file), &config)?;
    Ok(written)
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<BatchError>() {
        Some(e) if e.is_generation_failure() => 2,
        _ => 1,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payg_csv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    match run(&cli) {
        Ok(written) => {
            info!(files = written.len(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let status = exit_status(&e);
            debug!(status, "batch failed");
            eprintln!("payg-csv: {:#}", e);
            ExitCode::from(status)
        }
    }
}
