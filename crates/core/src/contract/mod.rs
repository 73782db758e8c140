//! Employment contract lifecycle.
//!
//! Contracts are the foundation every other module reads from: the payroll
//! calculator derives limits from them, and every payment references one.
//!
//! # Modules
//!
//! - `types` - Contract record and status
//! - `service` - Create, read, revoke and delete

pub mod service;
pub mod types;

pub use service::ContractService;
pub use types::{Contract, ContractStatus, NewContract};
