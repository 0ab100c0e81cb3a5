//! PAYG Generate - print pay as you go codes for a key

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payg_generate::{run, Cli, ExitStatus};

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only codes
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payg_generate=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::Ok.into(),
                _ => ExitStatus::InvalidOptions.into(),
            };
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run(&cli, &mut out) {
        Ok(()) => ExitStatus::Ok.into(),
        Err(e) => {
            debug!(status = ?e.exit_status(), "code generation failed");
            eprintln!("payg-generate: {}", e);
            e.exit_status().into()
        }
    }
}
