//! Regular and advance payment processing.
//!
//! # Modules
//!
//! - `types` - Payment record and its ledger key
//! - `service` - Authorization and recording of payroll disbursements

pub mod service;
pub mod types;

pub use service::PaymentService;
pub use types::{PAYMENT_NAMESPACE, Payment, PaymentType, WITHDRAWAL_NAMESPACE};
