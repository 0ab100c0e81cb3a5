//! PAYG CSV - batch generation of per-device code matrices
//!
//! A batch file lists `device_id,key` pairs. For every device this crate
//! derives the codes of each configured period for every counter and writes
//! them as one CSV file named after the device:
//!
//! ```text
//! 1 day,2 days,3 days
//! '<code>,'<code>,'<code>
//! ```
//!
//! Each cell carries a leading `'` so spreadsheet applications keep the
//! leading zeros. Rows ascend by counter and columns by period, and both
//! orders are checked before anything is written.

pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod matrix;
pub mod output;

use std::io::Read;
use std::path::PathBuf;

use tracing::info;

pub use batch::{BatchMatrixBuilder, DeviceCodes};
pub use codec::{
    code_cell, decode_batch, decode_matrix, encode_device, encode_matrix, DecodedMatrix,
    DeviceBatchEntry, BATCH_HEADER, CODE_CELL_PREFIX, PROVISIONING_HEADER, ROWS_PER_BLOCK,
};
pub use config::BatchConfig;
pub use error::{BatchError, Result};
pub use matrix::{check_columns, CodeMatrix};
pub use output::{FileId, OutputWriter};

/// Decode a batch, build every device's codes and write their files
///
/// Returns the paths written, in batch order. Nothing is written unless the
/// whole batch decodes and builds.
pub fn run_batch<R: Read>(input: R, config: &BatchConfig) -> Result<Vec<PathBuf>> {
    let periods = config.resolve_periods()?;
    let builder = BatchMatrixBuilder::new(periods)?;

    let entries = decode_batch(input)?;
    info!(entries = entries.len(), "decoded batch");

    let devices = builder.build(&entries)?;
    let writer = OutputWriter::new(config.output_dir.clone())?;
    let written = writer.write_all(&devices)?;

    info!(
        devices = devices.len(),
        output_dir = %writer.dir().display(),
        "batch complete"
    );
    Ok(written)
}
