//! Employee withdrawals against credited payments.

pub mod service;

pub use service::WithdrawalService;
