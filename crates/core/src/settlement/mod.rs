//! Settlement routing.
//!
//! A payment is dispatched to one of two channels and driven through
//! `Pending → Approved → Completed`. The inter-bank hops of each channel are
//! informational: they are logged and kept on the record as an audit trail,
//! and the record is persisted once, already Completed.
//!
//! # Modules
//!
//! - `types` - Channels, statuses, hops and the settlement record
//! - `router` - Dispatch and completion operations

pub mod router;
pub mod types;

#[cfg(test)]
mod types_props;

pub use router::SettlementRouter;
pub use types::{SettlementChannel, SettlementPayment, SettlementStatus, TransferHop};
