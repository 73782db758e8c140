//! Core business logic for Paysettle.
//!
//! This crate contains the payroll settlement logic with ZERO web or database
//! dependencies. Every operation reads and writes through a
//! [`gateway::LedgerGateway`] and holds no state beyond one invocation.
//!
//! # Modules
//!
//! - `gateway` - Ledger key-value contract, composite keys, in-memory substrate
//! - `contract` - Employment contract lifecycle
//! - `payroll` - Monthly payment calculation and payout limits
//! - `history` - Last-payment lookups over the payment key space
//! - `advance` - Advance request workflow
//! - `payment` - Regular and advance payment processing
//! - `withdrawal` - Withdrawals against credited payments
//! - `settlement` - Cross-border and local settlement routing

pub mod advance;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod history;
pub mod payment;
pub mod payroll;
pub mod settlement;
pub mod withdrawal;

#[cfg(test)]
pub(crate) mod test_support;

pub use advance::{AdvanceRequest, AdvanceService, AdvanceStatus, ApprovedAdvance};
pub use contract::{Contract, ContractService, ContractStatus, NewContract};
pub use error::PayrollError;
pub use gateway::{GatewayError, LedgerGateway, MemoryLedger};
pub use history::PaymentHistory;
pub use payment::{Payment, PaymentService, PaymentType};
pub use payroll::{PayrollCalculator, PayrollPeriod, PayrollPolicy};
pub use settlement::{
    SettlementChannel, SettlementPayment, SettlementRouter, SettlementStatus, TransferHop,
};
pub use withdrawal::WithdrawalService;
