//! Counter parsing and enumeration
//!
//! Whether a counter counts remaining or consumed uses is up to the device
//! daemon. Enumeration is always ascending, which keeps the emitted codes
//! ascending too.

use std::ops::RangeInclusive;

use crate::code::{Code, CodeDeriver};
use crate::error::{Error, Result};
use crate::key::SecretKey;
use crate::mac::KeyedHash;
use crate::period::Period;
use crate::MAX_COUNTER;

/// Counter distinguishing successive codes within one period
pub type Counter = u8;

/// Which counters of a period to produce codes for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterSelection {
    /// Exactly one counter, used as given
    Single(Counter),
    /// Every counter of the period, ascending
    All,
}

/// Ascending counters covering `period`
pub fn sequence(period: &Period) -> RangeInclusive<Counter> {
    0..=period.max_counter()
}

/// Parse a decimal counter
pub fn parse_counter(text: &str) -> Result<Counter> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::CounterNotANumber(text.to_string()));
    }
    let value: u64 = text
        .parse()
        .map_err(|_| Error::CounterNotANumber(text.to_string()))?;
    Counter::try_from(value).map_err(|_| Error::InvalidCounter(value))
}

impl CounterSelection {
    /// Counters selected for `period`, ascending
    pub fn counters(&self, period: &Period) -> RangeInclusive<Counter> {
        match *self {
            CounterSelection::Single(counter) => counter..=counter,
            CounterSelection::All => sequence(period),
        }
    }

    /// Derive the code for every selected counter
    pub fn codes<H: KeyedHash>(
        &self,
        deriver: &CodeDeriver<H>,
        key: &SecretKey,
        period: &Period,
    ) -> Result<Vec<Code>> {
        self.counters(period)
            .map(|counter| deriver.derive(key, period, counter))
            .collect()
    }
}

impl From<Option<Counter>> for CounterSelection {
    fn from(counter: Option<Counter>) -> Self {
        counter.map_or(CounterSelection::All, CounterSelection::Single)
    }
}

const _: () = assert!(MAX_COUNTER as u32 == (1 << crate::COUNTER_WIDTH_BITS) - 1);
