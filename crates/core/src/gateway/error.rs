//! Gateway error types.

use thiserror::Error;

/// Failures raised by the ledger substrate rather than by domain checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The store could not serve the read or write.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// A key or key component is malformed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A key read by this invocation was modified by a committed one.
    #[error("commit conflict on key {key:?}")]
    Conflict {
        /// The first conflicting key found.
        key: String,
    },
}

impl GatewayError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a conflict error.
    #[must_use]
    pub fn conflict(key: impl Into<String>) -> Self {
        Self::Conflict { key: key.into() }
    }
}
