//! Catalogue of validity periods a code can grant
//!
//! The table is fixed at build time. Positions are contiguous, and ids
//! increase with both position and duration, so iterating the table yields
//! periods in id order. Ids are part of the code format shared with devices
//! and must never be renumbered.

use std::cmp::Ordering;
use std::fmt;

use crate::counter::Counter;
use crate::error::{Error, Result};
use crate::{MAX_COUNTER, PERIOD_WIDTH_BITS};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// A named validity duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    id: u8,
    name: &'static str,
    label: &'static str,
    duration_secs: Option<u64>,
}

/// Id of the period with no expiry
pub const INFINITE_PERIOD_ID: u8 = 31;

const PERIOD_TABLE: [Period; 24] = [
    Period::new(0, "5s", "5 seconds", Some(5)),
    Period::new(1, "1m", "1 minute", Some(MINUTE)),
    Period::new(2, "5m", "5 minutes", Some(5 * MINUTE)),
    Period::new(3, "1h", "1 hour", Some(HOUR)),
    Period::new(4, "1d", "1 day", Some(DAY)),
    Period::new(5, "2d", "2 days", Some(2 * DAY)),
    Period::new(6, "3d", "3 days", Some(3 * DAY)),
    Period::new(7, "4d", "4 days", Some(4 * DAY)),
    Period::new(8, "5d", "5 days", Some(5 * DAY)),
    Period::new(9, "6d", "6 days", Some(6 * DAY)),
    Period::new(10, "7d", "7 days", Some(7 * DAY)),
    Period::new(11, "8d", "8 days", Some(8 * DAY)),
    Period::new(12, "9d", "9 days", Some(9 * DAY)),
    Period::new(13, "10d", "10 days", Some(10 * DAY)),
    Period::new(14, "11d", "11 days", Some(11 * DAY)),
    Period::new(15, "12d", "12 days", Some(12 * DAY)),
    Period::new(16, "13d", "13 days", Some(13 * DAY)),
    Period::new(17, "14d", "14 days", Some(14 * DAY)),
    Period::new(18, "30d", "30 days", Some(30 * DAY)),
    Period::new(19, "60d", "60 days", Some(60 * DAY)),
    Period::new(20, "90d", "90 days", Some(90 * DAY)),
    Period::new(21, "120d", "120 days", Some(120 * DAY)),
    Period::new(22, "365d", "365 days", Some(365 * DAY)),
    Period::new(INFINITE_PERIOD_ID, "infinite", "Infinite", None),
];

static PERIODS: [Period; 24] = PERIOD_TABLE;

impl Period {
    const fn new(
        id: u8,
        name: &'static str,
        label: &'static str,
        duration_secs: Option<u64>,
    ) -> Self {
        Self {
            id,
            name,
            label,
            duration_secs,
        }
    }

    /// All periods, in ascending id order
    pub fn all() -> &'static [Period] {
        &PERIODS
    }

    /// Look up a period by its short name (case-sensitive, exact match)
    pub fn resolve(name: &str) -> Result<&'static Period> {
        PERIODS
            .iter()
            .find(|period| period.name == name)
            .ok_or_else(|| Error::UnknownPeriod(name.to_string()))
    }

    /// Look up a period by the id encoded in a code
    pub fn from_id(id: u8) -> Result<&'static Period> {
        PERIODS
            .binary_search_by_key(&id, |period| period.id)
            .map(|index| &PERIODS[index])
            .map_err(|_| Error::InvalidPeriodId(id))
    }

    /// Numeric id used in the code layout
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Short name, e.g. "5d"
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable label, e.g. "5 days"
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Duration granted by a code, or `None` for the infinite period
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration_secs
    }

    pub fn is_infinite(&self) -> bool {
        self.id == INFINITE_PERIOD_ID
    }

    /// Highest counter enumerated for this period
    ///
    /// The infinite period has no counter progression and only uses 0.
    pub fn max_counter(&self) -> Counter {
        if self.is_infinite() {
            0
        } else {
            MAX_COUNTER
        }
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Every id must fit the period field of a code.
const _: () = {
    let mut i = 0;
    while i < PERIOD_TABLE.len() {
        assert!((PERIOD_TABLE[i].id as u32) < (1 << PERIOD_WIDTH_BITS));
        i += 1;
    }
};
