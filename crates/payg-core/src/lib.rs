//! PAYG Core - Unlock code derivation for pay-as-you-go devices
//!
//! A code is an 8-digit decimal string which packs a validity period, a
//! counter and a truncated keyed-hash signature over both:
//!
//! ```text
//! BITS        WIDTH   FIELD
//! ──────────────────────────────────────────
//! 21..=25     5       period id
//! 13..=20     8       counter
//! 0..=12      13      sign (HMAC-SHA-1 truncated)
//! ```
//!
//! Because each field outweighs everything below it, codes sort by period
//! first and counter second, whatever the signature bits are.

pub mod code;
pub mod counter;
pub mod error;
pub mod key;
pub mod mac;
pub mod period;

pub use code::{Code, CodeDeriver};
pub use counter::{parse_counter, sequence, Counter, CounterSelection};
pub use error::{Error, Result};
pub use key::SecretKey;
pub use mac::{HmacSha1, KeyedHash, MacOutput};
pub use period::Period;

/// Width of the counter field in bits
pub const COUNTER_WIDTH_BITS: u32 = 8;

/// Width of the period id field in bits
pub const PERIOD_WIDTH_BITS: u32 = 5;

/// Width of the signature field in bits
pub const SIGN_WIDTH_BITS: u32 = 13;

/// Total width of a code value in bits
pub const CODE_VALUE_WIDTH_BITS: u32 = COUNTER_WIDTH_BITS + PERIOD_WIDTH_BITS + SIGN_WIDTH_BITS;

/// Number of decimal digits in a rendered code
pub const CODE_STR_WIDTH_DIGITS: usize = 8;

/// Minimum shared key length in bytes (the SHA-1 block size, so HMAC never pads)
pub const KEY_LENGTH_BYTES_MINIMUM: usize = 64;

/// Highest counter value of an ordinary period
pub const MAX_COUNTER: Counter = u8::MAX;
