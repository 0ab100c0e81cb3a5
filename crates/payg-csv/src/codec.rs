//! CSV layout of batch input and per-device output
//!
//! Output cells are written as `'` followed by the 8-digit code and no closing
//! quote. Spreadsheet applications read that as a text literal, which keeps the
//! leading zeros; it is not CSV quoting and must stay unbalanced.

use std::io::{Read, Write};

use payg_core::{Code, SecretKey, MAX_COUNTER};

use crate::batch::DeviceCodes;
use crate::error::{BatchError, Result};
use crate::matrix::CodeMatrix;

/// Header of a plain device/key batch
pub const BATCH_HEADER: [&str; 2] = ["device_id", "key"];

/// Header of the records written by the provisioning tool
pub const PROVISIONING_HEADER: [&str; 5] = ["device_id", "code1", "code2", "code3", "key"];

/// Prefix marking a cell as text for spreadsheet applications
pub const CODE_CELL_PREFIX: char = '\'';

/// One device/key pair from a batch file
#[derive(Debug, Clone)]
pub struct DeviceBatchEntry {
    /// Device identifier, as written in the batch
    pub device_id: String,
    /// Shared key provisioned on the device
    pub key: SecretKey,
    /// Line of the batch file this entry came from
    pub line: u64,
}

/// Column positions of the fields used from a batch row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchLayout {
    Pairs,
    Provisioning,
}

impl BatchLayout {
    fn detect(header: &csv::ByteRecord) -> Option<Self> {
        let matches = |expected: &[&str]| {
            header
                .iter()
                .eq(expected.iter().map(|field| field.as_bytes()))
        };
        if matches(&BATCH_HEADER[..]) {
            Some(BatchLayout::Pairs)
        } else if matches(&PROVISIONING_HEADER[..]) {
            Some(BatchLayout::Provisioning)
        } else {
            None
        }
    }

    fn width(&self) -> usize {
        match self {
            BatchLayout::Pairs => BATCH_HEADER.len(),
            BatchLayout::Provisioning => PROVISIONING_HEADER.len(),
        }
    }

    fn key_column(&self) -> usize {
        self.width() - 1
    }
}

fn expected_header(found: Option<&csv::ByteRecord>) -> BatchError {
    let found = match found {
        Some(record) => record
            .iter()
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join(","),
        None => "an empty file".to_string(),
    };
    BatchError::Format(format!(
        "expected header ‘{}’ (or ‘{}’), found ‘{}’",
        BATCH_HEADER.join(","),
        PROVISIONING_HEADER.join(","),
        found
    ))
}

/// Decode a batch file
///
/// The first record must be one of the known headers. Every following row
/// must match its width, carry a non-empty device id, and a key of at least
/// the minimum length; the first violation rejects the whole batch.
pub fn decode_batch<R: Read>(input: R) -> Result<Vec<DeviceBatchEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.byte_records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(expected_header(None)),
    };
    let layout = BatchLayout::detect(&header).ok_or_else(|| expected_header(Some(&header)))?;

    let mut entries = Vec::new();
    for record in records {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());

        if record.len() != layout.width() {
            return Err(BatchError::Format(format!(
                "line {}: expected {} fields, found {}",
                line,
                layout.width(),
                record.len()
            )));
        }

        let device_id = std::str::from_utf8(&record[0])
            .map_err(|_| BatchError::Format(format!("line {}: device_id is not UTF-8", line)))?;
        if device_id.is_empty() {
            return Err(BatchError::Format(format!("line {}: empty device_id", line)));
        }

        let key = SecretKey::new(record[layout.key_column()].to_vec())
            .map_err(|source| BatchError::Row { line, source })?;

        entries.push(DeviceBatchEntry {
            device_id: device_id.to_string(),
            key,
            line,
        });
    }
    Ok(entries)
}

/// Render a code as a spreadsheet text cell
pub fn code_cell(code: &Code) -> String {
    format!("{}{}", CODE_CELL_PREFIX, code)
}

fn write_header<W: Write>(writer: &mut csv::Writer<W>, matrix: &CodeMatrix) -> Result<()> {
    writer.write_record(matrix.periods().iter().map(|period| period.label()))?;
    Ok(())
}

fn write_rows<W: Write>(writer: &mut csv::Writer<W>, matrix: &CodeMatrix) -> Result<()> {
    for row in matrix.rows() {
        writer.write_record(row.iter().map(code_cell))?;
    }
    Ok(())
}

/// Encode a single matrix: period label header followed by one row per counter
pub fn encode_matrix(matrix: &CodeMatrix) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_header(&mut writer, matrix)?;
    write_rows(&mut writer, matrix)?;
    into_string(writer)
}

/// Encode a device's output file: one header, then every matrix's rows in
/// batch order
pub fn encode_device(device: &DeviceCodes) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut matrices = device.matrices().iter();

    if let Some(first) = matrices.next() {
        write_header(&mut writer, first)?;
        write_rows(&mut writer, first)?;
    }
    for matrix in matrices {
        write_rows(&mut writer, matrix)?;
    }
    into_string(writer)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| BatchError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| BatchError::Format(e.to_string()))
}

/// Rows written for each key of a device, one per counter
pub const ROWS_PER_BLOCK: usize = MAX_COUNTER as usize + 1;

/// A per-device output file read back
///
/// A device listed with several keys gets one block of [`ROWS_PER_BLOCK`] rows
/// per key, in batch order, under a single header. Ordering holds inside each
/// block only: the first row of a block usually sorts below the last row of
/// the block before it. Check blocks one at a time with [`blocks`].
///
/// [`blocks`]: DecodedMatrix::blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMatrix {
    /// Period labels
    pub header: Vec<String>,
    /// Code rows of every block, concatenated
    pub rows: Vec<Vec<Code>>,
}

impl DecodedMatrix {
    /// Rows split into the per-key blocks they were written as
    pub fn blocks(&self) -> std::slice::Chunks<'_, Vec<Code>> {
        self.rows.chunks(ROWS_PER_BLOCK)
    }

    /// Number of keys the file holds codes for
    pub fn block_count(&self) -> usize {
        self.rows.len().div_ceil(ROWS_PER_BLOCK)
    }
}

/// Read a per-device output file back
///
/// Every body cell must be a quote-prefixed 8-digit code and every row must be
/// as wide as the header. The rows of all key blocks are returned together; see
/// [`DecodedMatrix::blocks`].
pub fn decode_matrix<R: Read>(input: R) -> Result<DecodedMatrix> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    let header = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|cell| -> Result<Code> {
                let digits = cell.strip_prefix(CODE_CELL_PREFIX).ok_or_else(|| {
                    BatchError::Format(format!("cell ‘{}’ lacks the text prefix", cell))
                })?;
                Ok(digits.parse::<Code>()?)
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }
    Ok(DecodedMatrix { header, rows })
}
