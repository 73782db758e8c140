//! Payroll computation.
//!
//! Derives the periodic payment owed under a contract and the caps every
//! advance and payment is checked against.
//!
//! # Modules
//!
//! - `calculator` - Monthly payment and limit policy
//! - `period` - Calendar-month payroll periods

pub mod calculator;
pub mod period;

#[cfg(test)]
mod calculator_props;

pub use calculator::{PayrollCalculator, PayrollPolicy};
pub use period::{PayrollPeriod, is_zero_timestamp, zero_timestamp};
