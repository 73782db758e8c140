//! Caller-facing error types.
//!
//! Every failure of a ledger invocation reaches the caller as one of these
//! kinds plus a human-readable message.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced entity is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate creation.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Amount exceeds a computed cap.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// Regular payment already made in the current period.
    #[error("Already paid this period: {0}")]
    AlreadyPaidThisPeriod(String),

    /// Withdrawal exceeds the available credit.
    #[error("Insufficient credit: {0}")]
    InsufficientCredit(String),

    /// Unrecognized settlement channel or record of the wrong channel.
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// Record is not in a state that allows the requested transition.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored bytes failed to decode.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Underlying store read or write failed.
    #[error("Gateway failure: {0}")]
    GatewayFailure(String),

    /// Concurrent invocation modified data this invocation read.
    #[error("Commit conflict: {0}")]
    CommitConflict(String),
}

impl AppError {
    /// Returns the status code reported with this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidType(_) => 400,
            Self::NotFound(_) => 404,
            Self::AlreadyExists(_) | Self::CommitConflict(_) => 409,
            Self::LimitExceeded(_)
            | Self::AlreadyPaidThisPeriod(_)
            | Self::InsufficientCredit(_)
            | Self::InvalidTransition(_) => 422,
            Self::Corrupt(_) | Self::GatewayFailure(_) => 500,
        }
    }

    /// Returns the error code for responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::LimitExceeded(_) => "LIMIT_EXCEEDED",
            Self::AlreadyPaidThisPeriod(_) => "ALREADY_PAID_THIS_PERIOD",
            Self::InsufficientCredit(_) => "INSUFFICIENT_CREDIT",
            Self::InvalidType(_) => "INVALID_TYPE",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Corrupt(_) => "CORRUPT_RECORD",
            Self::GatewayFailure(_) => "GATEWAY_FAILURE",
            Self::CommitConflict(_) => "COMMIT_CONFLICT",
        }
    }

    /// Returns true if resubmitting the whole invocation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::CommitConflict(_))
    }

    /// Returns the human-readable message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(m)
            | Self::AlreadyExists(m)
            | Self::LimitExceeded(m)
            | Self::AlreadyPaidThisPeriod(m)
            | Self::InsufficientCredit(m)
            | Self::InvalidType(m)
            | Self::InvalidTransition(m)
            | Self::Validation(m)
            | Self::Corrupt(m)
            | Self::GatewayFailure(m)
            | Self::CommitConflict(m) => m,
        }
    }
}
