//! Shared secret key loading and validation

use std::fmt;
use std::path::Path;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::KEY_LENGTH_BYTES_MINIMUM;

/// Raw shared key provisioned on a device
///
/// The bytes are used exactly as stored; no trimming or decoding is applied.
/// They are wiped on drop and never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Wrap key material, rejecting keys shorter than the minimum length
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        validate_length(&bytes)?;
        Ok(Self { bytes })
    }

    /// Read the entire content of `path` as a key
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::KeyUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(bytes)
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Check that `bytes` is long enough to be used as a key
pub(crate) fn validate_length(bytes: &[u8]) -> Result<()> {
    if bytes.len() < KEY_LENGTH_BYTES_MINIMUM {
        return Err(Error::KeyTooShort {
            actual: bytes.len(),
            minimum: KEY_LENGTH_BYTES_MINIMUM,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimum_length_accepted() {
        let key = SecretKey::new(vec![b'k'; KEY_LENGTH_BYTES_MINIMUM]).unwrap();
        assert_eq!(key.len(), 64);
    }

    #[test]
    fn test_short_key_reports_length() {
        match SecretKey::new(b"short".to_vec()) {
            Err(Error::KeyTooShort { actual, minimum }) => {
                assert_eq!(actual, 5);
                assert_eq!(minimum, 64);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_keeps_bytes_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let content = b"  leading spaces and a trailing newline are part of the key material\n";
        file.write_all(content).unwrap();

        let key = SecretKey::load(file.path()).unwrap();
        assert_eq!(key.as_bytes(), content);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-key");

        let err = SecretKey::load(&missing).unwrap_err();
        assert!(matches!(err, Error::KeyUnreadable { .. }));
        assert!(!err.is_key_strength());
    }

    #[test]
    fn test_load_short_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"short").unwrap();

        let err = SecretKey::load(file.path()).unwrap_err();
        assert!(err.is_key_strength());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = SecretKey::new(vec![b'z'; 80]).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("80"));
        assert!(!debug.contains("zzz"));
    }
}
