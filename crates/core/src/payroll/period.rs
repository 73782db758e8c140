//! Calendar-month payroll periods.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds from the Unix epoch back to 0001-01-01T00:00:00Z.
const ZERO_TIMESTAMP_SECS: i64 = -62_135_596_800;

/// The timestamp reported when a contract has no payment history.
#[must_use]
pub fn zero_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIMESTAMP_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Returns true if `ts` is the no-history marker.
#[must_use]
pub fn is_zero_timestamp(ts: &DateTime<Utc>) -> bool {
    *ts <= zero_timestamp()
}

/// A calendar month. Regular payments are limited to one per period.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Calendar year.
    pub year: i32,
    /// Month of the year (1-12).
    pub month: u32,
}

impl PayrollPeriod {
    /// Period containing `ts`.
    #[must_use]
    pub fn of(ts: &DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// Returns true if `ts` falls within this period.
    #[must_use]
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        Self::of(ts) == *self
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Debug for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayrollPeriod({self})")
    }
}
