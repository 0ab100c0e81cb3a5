//! Code derivation, formatting and verification
//!
//! The scheme follows HOTP (RFC 4226) with a shorter truncation so the whole
//! code fits in 8 decimal digits:
//!
//! ```text
//! sign  = (HMAC-SHA-1(K, P ∥ C)[18..20] as u16) & 0x1FFF
//! value = P << 21 | C << 13 | sign
//! ```
//!
//! A counter step adds 2^13 to the value, more than any sign can contribute,
//! and a period step adds 2^21, more than any counter and sign together. Codes
//! are therefore ordered by (period, counter) by construction.

use std::fmt;
use std::str::FromStr;

use crate::counter::Counter;
use crate::error::{Error, Result};
use crate::key::SecretKey;
use crate::mac::{HmacSha1, KeyedHash};
use crate::period::Period;
use crate::{
    CODE_STR_WIDTH_DIGITS, CODE_VALUE_WIDTH_BITS, COUNTER_WIDTH_BITS, PERIOD_WIDTH_BITS,
    SIGN_WIDTH_BITS,
};

/// Digest bytes holding the sign
const SIGN_WINDOW: std::ops::Range<usize> = 18..20;

const SIGN_MASK: u32 = (1 << SIGN_WIDTH_BITS) - 1;
const COUNTER_MASK: u32 = (1 << COUNTER_WIDTH_BITS) - 1;
const PERIOD_MASK: u32 = (1 << PERIOD_WIDTH_BITS) - 1;
const PERIOD_SHIFT: u32 = COUNTER_WIDTH_BITS + SIGN_WIDTH_BITS;

// The largest code value must still render in 8 digits.
const _: () = assert!((1u64 << CODE_VALUE_WIDTH_BITS) <= 10u64.pow(CODE_STR_WIDTH_DIGITS as u32));

/// An unlock code in integer form (26 significant bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(u32);

impl Code {
    /// Wrap a code value, rejecting values outside the code space
    pub fn new(value: u32) -> Result<Self> {
        if value >> CODE_VALUE_WIDTH_BITS != 0 {
            return Err(Error::InvalidCode(format!("{:08}", value)));
        }
        Ok(Self(value))
    }

    fn pack(period_id: u8, counter: Counter, sign: u16) -> Self {
        Self(
            (u32::from(period_id) << PERIOD_SHIFT)
                | (u32::from(counter) << SIGN_WIDTH_BITS)
                | (u32::from(sign) & SIGN_MASK),
        )
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Period id field
    pub fn period_id(&self) -> u8 {
        ((self.0 >> PERIOD_SHIFT) & PERIOD_MASK) as u8
    }

    /// Counter field
    pub fn counter(&self) -> Counter {
        ((self.0 >> SIGN_WIDTH_BITS) & COUNTER_MASK) as Counter
    }

    /// Truncated signature field
    pub fn sign(&self) -> u16 {
        (self.0 & SIGN_MASK) as u16
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = CODE_STR_WIDTH_DIGITS)
    }
}

impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != CODE_STR_WIDTH_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCode("Codes must be 8 digits long.".to_string()));
        }
        let value: u32 = s
            .parse()
            .map_err(|_| Error::InvalidCode(s.to_string()))?;
        Self::new(value)
    }
}

/// Derives and verifies codes with a keyed hash
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeDeriver<H = HmacSha1> {
    hash: H,
}

impl CodeDeriver {
    /// Deriver using HMAC-SHA-1
    pub fn new() -> Self {
        Self { hash: HmacSha1 }
    }
}

impl<H: KeyedHash> CodeDeriver<H> {
    /// Use a specific keyed hash
    pub fn with_hash(hash: H) -> Self {
        Self { hash }
    }

    /// Derive the code for `period` and `counter` under `key`
    ///
    /// Pure: the same inputs always give the same code.
    pub fn derive(&self, key: &SecretKey, period: &Period, counter: Counter) -> Result<Code> {
        let digest = self
            .hash
            .keyed_digest(key.as_bytes(), &[period.id(), counter])?;
        let window = &digest[SIGN_WINDOW];
        let sign = u16::from_be_bytes([window[0], window[1]]);
        Ok(Code::pack(period.id(), counter, sign))
    }

    /// Check that `code` was signed with `key`
    ///
    /// Returns the period and counter carried by the code.
    pub fn verify(&self, code: Code, key: &SecretKey) -> Result<(&'static Period, Counter)> {
        let period = Period::from_id(code.period_id())?;
        let counter = code.counter();

        if self.derive(key, period, counter)? != code {
            return Err(Error::InvalidSignature(code.to_string()));
        }
        Ok((period, counter))
    }
}
