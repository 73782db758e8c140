//! Payment history index.
//!
//! The ledger keeps no secondary index, so "most recent" facts are derived
//! by scanning the composite-key prefix of one contract, or of one
//! contract and employee. The scan is bounded by that history, not by the
//! size of the ledger.
//!
//! # Modules
//!
//! - `index` - Last-payment lookups and withdrawal totals

pub mod index;

#[cfg(test)]
mod index_props;

pub use index::PaymentHistory;
