//! End-to-end workflow tests for the PAYG code tools
//!
//! A key is provisioned once, codes are produced both by the single-code
//! query and by the batch sheets, and a device holding the same key accepts
//! them.

use std::fs;
use std::io::Write;

use payg_core::{Code, CodeDeriver, Error, Period, SecretKey};
use payg_csv::{decode_matrix, run_batch, BatchConfig, FileId};
use payg_generate::{run, Cli, ExitStatus};

const DEVICE_KEY: &str =
    "hello this has to be at least 64 bytes long so I am going to keep on typing.";

fn generate(key_path: &str, args: &[&str]) -> Vec<Code> {
    let cli = Cli {
        quiet: false,
        list_periods: false,
        args: std::iter::once(key_path)
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect(),
    };
    let mut out = Vec::new();
    run(&cli, &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| line.parse().unwrap())
        .collect()
}

#[test]
fn test_provision_issue_and_accept() {
    let workdir = tempfile::tempdir().unwrap();

    // ==========================================
    // STEP 1: Provision the device key
    // ==========================================
    let key_path = workdir.path().join("device.key");
    fs::write(&key_path, DEVICE_KEY).unwrap();
    let device_key = SecretKey::load(&key_path).unwrap();
    let key_path = key_path.to_str().unwrap();

    // ==========================================
    // STEP 2: Produce the retailer sheet
    // ==========================================
    let mut batch = tempfile::NamedTempFile::new().unwrap();
    writeln!(batch, "device_id,key").unwrap();
    writeln!(batch, "3F0A1564,{}", DEVICE_KEY).unwrap();
    batch.flush().unwrap();

    let config = BatchConfig {
        output_dir: workdir.path().join("sheets"),
        periods: vec!["1d".to_string(), "7d".to_string(), "30d".to_string()],
    };
    let written = run_batch(fs::File::open(batch.path()).unwrap(), &config).unwrap();
    assert_eq!(
        written,
        vec![config
            .output_dir
            .join(FileId::from_device_id("3F0A1564").file_name())]
    );
    let sheet = decode_matrix(fs::File::open(&written[0]).unwrap()).unwrap();

    // ==========================================
    // STEP 3: The single-code query agrees with the sheet
    // ==========================================
    let one_day = generate(key_path, &["1d"]);
    let sheet_one_day: Vec<Code> = sheet.rows.iter().map(|row| row[0]).collect();
    assert_eq!(one_day, sheet_one_day);

    let seven_days = generate(key_path, &["7d", "250"]);
    assert_eq!(seven_days, vec![sheet.rows[250][1]]);
    assert_eq!(seven_days[0].to_string(), "23027316");

    // ==========================================
    // STEP 4: The device accepts every sheet code
    // ==========================================
    let device = CodeDeriver::new();
    for (counter, row) in sheet.rows.iter().enumerate() {
        for (column, code) in row.iter().enumerate() {
            let (period, accepted) = device.verify(*code, &device_key).unwrap();
            assert_eq!(period, config_period(&config, column));
            assert_eq!(usize::from(accepted), counter);
        }
    }

    // ==========================================
    // STEP 5: Another device rejects them
    // ==========================================
    let other_key = SecretKey::new(DEVICE_KEY.repeat(2).into_bytes()).unwrap();
    let err = device.verify(sheet.rows[0][0], &other_key).unwrap_err();
    assert!(matches!(err, Error::InvalidSignature(_)));
}

fn config_period(config: &BatchConfig, column: usize) -> &'static Period {
    Period::resolve(&config.periods[column]).unwrap()
}

#[test]
fn test_infinite_code_is_issued_but_not_sheeted() {
    let workdir = tempfile::tempdir().unwrap();
    let key_path = workdir.path().join("device.key");
    fs::write(&key_path, DEVICE_KEY).unwrap();

    let codes = generate(key_path.to_str().unwrap(), &["infinite"]);
    assert_eq!(codes.len(), 1);

    let device_key = SecretKey::load(&key_path).unwrap();
    let (period, counter) = CodeDeriver::new().verify(codes[0], &device_key).unwrap();
    assert!(period.is_infinite());
    assert_eq!(counter, 0);

    let config = BatchConfig {
        output_dir: workdir.path().join("sheets"),
        periods: vec!["infinite".to_string()],
    };
    let batch = format!("device_id,key\nDEV,{}\n", DEVICE_KEY);
    assert!(run_batch(batch.as_bytes(), &config).is_err());
    assert!(!config.output_dir.exists());
}

#[test]
fn test_weak_key_rejected_everywhere() {
    let workdir = tempfile::tempdir().unwrap();
    let key_path = workdir.path().join("weak.key");
    fs::write(&key_path, "too short").unwrap();

    let cli = Cli {
        quiet: false,
        list_periods: false,
        args: vec![key_path.to_str().unwrap().to_string(), "1d".to_string()],
    };
    let err = run(&cli, &mut Vec::new()).unwrap_err();
    assert_eq!(err.exit_status(), ExitStatus::Failed);

    let config = BatchConfig {
        output_dir: workdir.path().join("sheets"),
        periods: Vec::new(),
    };
    let batch = "device_id,key\nDEV,too short\n";
    let err = run_batch(batch.as_bytes(), &config).unwrap_err();
    assert!(err.is_key_strength());
    assert!(!config.output_dir.exists());
}
