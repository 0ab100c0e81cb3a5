//! Per-device output files

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::batch::DeviceCodes;
use crate::codec::encode_device;
use crate::error::{BatchError, Result};

/// Length of a file identifier in bytes (8 hex characters)
pub const FILE_ID_LEN: usize = 4;

/// Short stable identifier naming a device's output file
///
/// The first bytes of SHA-256 over the device id, rendered as upper-case hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId([u8; FILE_ID_LEN]);

impl FileId {
    /// Derive the identifier for `device_id`
    pub fn from_device_id(device_id: &str) -> Self {
        let hash = Sha256::digest(device_id.as_bytes());
        let mut bytes = [0u8; FILE_ID_LEN];
        bytes.copy_from_slice(&hash[..FILE_ID_LEN]);
        Self(bytes)
    }

    /// Output file name, e.g. `3F0A1564.csv`
    pub fn file_name(&self) -> String {
        format!("{}.csv", self)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// Writes device files into one directory
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Create a writer, creating `dir` if needed
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir).map_err(|source| BatchError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a device's file is written to
    pub fn path_for(&self, device: &DeviceCodes) -> PathBuf {
        self.dir.join(device.file_id().file_name())
    }

    /// Encode every device, then write them all
    ///
    /// Encoding happens before the first write, and each file is written to a
    /// temporary sibling and renamed into place, so no file is ever partial.
    pub fn write_all(&self, devices: &[DeviceCodes]) -> Result<Vec<PathBuf>> {
        let encoded = devices
            .iter()
            .map(|device| Ok((device, encode_device(device)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut written = Vec::with_capacity(encoded.len());
        for (device, content) in encoded {
            let path = self.path_for(device);
            write_atomic(&path, content.as_bytes())?;
            info!(device_id = device.device_id(), path = %path.display(), "wrote codes");
            written.push(path);
        }
        Ok(written)
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    // Write to temp file first, then rename for atomicity
    let temp_path = path.with_extension("csv.tmp");
    let result =
        std::fs::write(&temp_path, content).and_then(|()| std::fs::rename(&temp_path, path));
    if let Err(source) = result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(BatchError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
