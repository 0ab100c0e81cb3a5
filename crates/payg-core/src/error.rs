//! Error types for code derivation

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read key file {}: {source}", path.display())]
    KeyUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key is too short ({actual} bytes); minimum length {minimum} bytes.")]
    KeyTooShort { actual: usize, minimum: usize },

    #[error("Invalid period ‘{0}’.")]
    UnknownPeriod(String),

    #[error("Unknown period {0}.")]
    InvalidPeriodId(u8),

    #[error("Counter {0} is out of range [0, 255].")]
    InvalidCounter(u64),

    #[error("“{0}” is not an unsigned number")]
    CounterNotANumber(String),

    #[error("Invalid code {0}.")]
    InvalidCode(String),

    #[error("Invalid signature on code {0}.")]
    InvalidSignature(String),

    #[error("Batch format error: {0}")]
    BatchFormat(String),

    #[error("Keyed hash error: {0}")]
    Mac(String),
}

impl Error {
    /// Whether this error is about the strength of the provisioned secret,
    /// rather than about the arguments it was used with
    pub fn is_key_strength(&self) -> bool {
        matches!(self, Error::KeyTooShort { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_too_short_message() {
        let err = Error::KeyTooShort {
            actual: 5,
            minimum: 64,
        };
        assert_eq!(
            err.to_string(),
            "Key is too short (5 bytes); minimum length 64 bytes."
        );
        assert!(err.is_key_strength());
    }

    #[test]
    fn test_validation_errors_are_not_key_strength() {
        assert!(!Error::UnknownPeriod("2w".into()).is_key_strength());
        assert!(!Error::CounterNotANumber("x".into()).is_key_strength());
        assert!(!Error::BatchFormat("expected header".into()).is_key_strength());
    }

    #[test]
    fn test_unknown_period_keeps_input_verbatim() {
        let err = Error::UnknownPeriod("not really valid".into());
        assert_eq!(err.to_string(), "Invalid period ‘not really valid’.");
    }
}
