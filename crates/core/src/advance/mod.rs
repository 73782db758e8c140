//! Advance request workflow.
//!
//! An employee requests an advance bounded by the contract's payroll; a
//! separate authority approves it, which pays it out as an Advance payment
//! in the same invocation.
//!
//! # Modules
//!
//! - `types` - Advance request record and status
//! - `service` - Request and approval operations

pub mod service;
pub mod types;

pub use service::{AdvanceService, ApprovedAdvance};
pub use types::{AdvanceRequest, AdvanceStatus};
