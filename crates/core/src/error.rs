//! Payroll error types for domain checks and ledger failures.
//!
//! This module defines every error a payroll invocation can abort with.
//! Each variant maps onto exactly one caller-facing [`AppError`] kind.

use paysettle_shared::AppError;
use paysettle_shared::types::{AdvanceRequestId, ContractId, IdError, SettlementId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::payment::PaymentType;
use crate::payroll::PayrollPeriod;

/// Errors that can occur during payroll operations.
#[derive(Debug, Error)]
pub enum PayrollError {
    // ========== Missing Records ==========
    /// Contract not found.
    #[error("the contract {0} does not exist")]
    ContractNotFound(ContractId),

    /// Advance request not found.
    #[error("the advance request {0} does not exist")]
    AdvanceRequestNotFound(AdvanceRequestId),

    /// Settlement payment not found.
    #[error("the settlement payment {0} does not exist")]
    SettlementNotFound(SettlementId),

    /// No credited payment exists for the employee under the contract.
    #[error("no payments found for employee {employee} in contract {contract_id}")]
    NoPaymentHistory {
        /// The contract scanned.
        contract_id: ContractId,
        /// The employee scanned.
        employee: String,
    },

    // ========== Duplicates ==========
    /// Contract already exists.
    #[error("the contract {0} already exists")]
    ContractAlreadyExists(ContractId),

    /// Advance request already exists.
    #[error("the advance request {0} already exists")]
    AdvanceRequestAlreadyExists(AdvanceRequestId),

    /// A derived record key is already taken.
    #[error("a record already exists under {0}")]
    RecordAlreadyExists(String),

    // ========== Limits ==========
    /// Advance request exceeds its cap.
    #[error("advance amount {amount} exceeds limit {limit}")]
    AdvanceLimitExceeded {
        /// The requested amount.
        amount: Decimal,
        /// The computed cap.
        limit: Decimal,
    },

    /// Payment exceeds its cap.
    #[error("payment amount {amount} exceeds limit {limit}")]
    PaymentLimitExceeded {
        /// The payment amount.
        amount: Decimal,
        /// The computed cap.
        limit: Decimal,
    },

    /// Regular payment already made in the current period.
    #[error("contract {contract_id} already received a regular payment in {period}")]
    AlreadyPaidThisPeriod {
        /// The contract paid.
        contract_id: ContractId,
        /// The period already paid.
        period: PayrollPeriod,
    },

    /// Withdrawal exceeds the remaining credit.
    #[error("withdrawal amount {requested} exceeds available credit {available}")]
    InsufficientCredit {
        /// The requested withdrawal.
        requested: Decimal,
        /// What remains of the most recent credit.
        available: Decimal,
    },

    // ========== Types and States ==========
    /// Settlement channel name not recognized.
    #[error("invalid settlement channel: {0}")]
    InvalidChannel(String),

    /// Settlement record belongs to a different channel than the operation.
    #[error("settlement payment {id} is a {actual} payment, not {expected}")]
    ChannelMismatch {
        /// The settlement record.
        id: SettlementId,
        /// The channel the operation handles.
        expected: String,
        /// The channel stored on the record.
        actual: String,
    },

    /// Payment type cannot be processed by this operation.
    #[error("{0} payments cannot be processed here")]
    UnsupportedPaymentType(PaymentType),

    /// Status transition not allowed.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: String,
        /// The attempted target status.
        to: String,
    },

    /// Contract is revoked.
    #[error("the contract {0} is not active")]
    ContractInactive(ContractId),

    // ========== Validation ==========
    /// Amount must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Compensation component is negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeCompensation {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// Identifier cannot be used as a ledger key.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Employee name is empty or unusable in a key.
    #[error("invalid employee name: {0:?}")]
    InvalidEmployee(String),

    // ========== Storage ==========
    /// Stored bytes failed to decode.
    #[error("corrupt record under {key:?}: {reason}")]
    Corrupt {
        /// The ledger key.
        key: String,
        /// The decoder's message.
        reason: String,
    },

    /// Ledger substrate failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PayrollError {
    /// Create a corrupt record error.
    #[must_use]
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid transition error.
    #[must_use]
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns the error code for responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ContractNotFound(_)
            | Self::AdvanceRequestNotFound(_)
            | Self::SettlementNotFound(_)
            | Self::NoPaymentHistory { .. } => "NOT_FOUND",
            Self::ContractAlreadyExists(_)
            | Self::AdvanceRequestAlreadyExists(_)
            | Self::RecordAlreadyExists(_) => "ALREADY_EXISTS",
            Self::AdvanceLimitExceeded { .. } | Self::PaymentLimitExceeded { .. } => {
                "LIMIT_EXCEEDED"
            }
            Self::AlreadyPaidThisPeriod { .. } => "ALREADY_PAID_THIS_PERIOD",
            Self::InsufficientCredit { .. } => "INSUFFICIENT_CREDIT",
            Self::InvalidChannel(_)
            | Self::ChannelMismatch { .. }
            | Self::UnsupportedPaymentType(_) => "INVALID_TYPE",
            Self::InvalidTransition { .. } | Self::ContractInactive(_) => "INVALID_TRANSITION",
            Self::NonPositiveAmount(_)
            | Self::NegativeCompensation { .. }
            | Self::InvalidId(_)
            | Self::InvalidEmployee(_) => "VALIDATION_ERROR",
            Self::Corrupt { .. } => "CORRUPT_RECORD",
            Self::Gateway(GatewayError::Conflict { .. }) => "COMMIT_CONFLICT",
            Self::Gateway(_) => "GATEWAY_FAILURE",
        }
    }
}

impl From<PayrollError> for AppError {
    fn from(err: PayrollError) -> Self {
        let message = err.to_string();
        match err {
            PayrollError::ContractNotFound(_)
            | PayrollError::AdvanceRequestNotFound(_)
            | PayrollError::SettlementNotFound(_)
            | PayrollError::NoPaymentHistory { .. } => Self::NotFound(message),
            PayrollError::ContractAlreadyExists(_)
            | PayrollError::AdvanceRequestAlreadyExists(_)
            | PayrollError::RecordAlreadyExists(_) => Self::AlreadyExists(message),
            PayrollError::AdvanceLimitExceeded { .. }
            | PayrollError::PaymentLimitExceeded { .. } => Self::LimitExceeded(message),
            PayrollError::AlreadyPaidThisPeriod { .. } => Self::AlreadyPaidThisPeriod(message),
            PayrollError::InsufficientCredit { .. } => Self::InsufficientCredit(message),
            PayrollError::InvalidChannel(_)
            | PayrollError::ChannelMismatch { .. }
            | PayrollError::UnsupportedPaymentType(_) => Self::InvalidType(message),
            PayrollError::InvalidTransition { .. } | PayrollError::ContractInactive(_) => {
                Self::InvalidTransition(message)
            }
            PayrollError::NonPositiveAmount(_)
            | PayrollError::NegativeCompensation { .. }
            | PayrollError::InvalidId(_)
            | PayrollError::InvalidEmployee(_) => Self::Validation(message),
            PayrollError::Corrupt { .. } => Self::Corrupt(message),
            PayrollError::Gateway(GatewayError::Conflict { .. }) => Self::CommitConflict(message),
            PayrollError::Gateway(_) => Self::GatewayFailure(message),
        }
    }
}

/// Rejects zero and negative amounts.
pub(crate) fn ensure_positive(amount: Decimal) -> Result<(), PayrollError> {
    if amount <= Decimal::ZERO {
        return Err(PayrollError::NonPositiveAmount(amount));
    }
    Ok(())
}

/// Rejects employee names that cannot be used as a key attribute.
pub(crate) fn ensure_employee(employee: &str) -> Result<(), PayrollError> {
    if paysettle_shared::types::validate_id(employee).is_err() {
        return Err(PayrollError::InvalidEmployee(employee.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_every_error_code_matches_app_error() {
        let errors = vec![
            PayrollError::ContractNotFound(ContractId::new("C1")),
            PayrollError::NoPaymentHistory {
                contract_id: ContractId::new("C1"),
                employee: "E1".into(),
            },
            PayrollError::ContractAlreadyExists(ContractId::new("C1")),
            PayrollError::AdvanceLimitExceeded {
                amount: dec!(3000),
                limit: dec!(2400),
            },
            PayrollError::InsufficientCredit {
                requested: dec!(2500),
                available: dec!(2000),
            },
            PayrollError::InvalidChannel("Wire".into()),
            PayrollError::UnsupportedPaymentType(PaymentType::Withdrawal),
            PayrollError::ContractInactive(ContractId::new("C1")),
            PayrollError::NonPositiveAmount(dec!(0)),
            PayrollError::corrupt("C1", "eof"),
            PayrollError::Gateway(GatewayError::conflict("C1")),
            PayrollError::Gateway(GatewayError::unavailable("down")),
        ];

        for err in errors {
            let code = err.error_code();
            let app: AppError = err.into();
            assert_eq!(app.error_code(), code);
        }
    }

    #[test]
    fn test_conflict_is_retryable_for_callers() {
        let app: AppError = PayrollError::Gateway(GatewayError::conflict("C1")).into();
        assert!(app.is_retryable());
        assert!(app.message().contains("C1"));
    }

    #[test]
    fn test_limit_message() {
        let err = PayrollError::AdvanceLimitExceeded {
            amount: dec!(3000),
            limit: dec!(2400),
        };
        assert_eq!(err.to_string(), "advance amount 3000 exceeds limit 2400");
    }

    #[test]
    fn test_amount_and_employee_guards() {
        assert!(ensure_positive(dec!(0.01)).is_ok());
        assert!(matches!(
            ensure_positive(dec!(0)),
            Err(PayrollError::NonPositiveAmount(_))
        ));
        assert!(ensure_employee("E1").is_ok());
        assert!(ensure_employee("").is_err());
        assert!(ensure_employee("E\u{0}1").is_err());
    }
}
