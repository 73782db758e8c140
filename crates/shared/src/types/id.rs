//! Typed IDs for type-safe ledger record references.
//!
//! Using typed IDs prevents accidentally passing a `PaymentId` where a `ContractId` is expected.
//! Ledger identifiers are strings: some are chosen by the caller, others are derived.

use serde::{Deserialize, Serialize};

/// Delimiter reserved by the ledger's composite keys.
pub const KEY_DELIMITER: char = '\u{0}';

/// Error returned when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Identifier is empty.
    #[error("identifier must not be empty")]
    Empty,
    /// Identifier contains the composite-key delimiter.
    #[error("identifier must not contain U+0000: {0:?}")]
    ReservedCharacter(String),
}

/// Checks that a raw identifier can be used as a ledger key component.
///
/// # Errors
///
/// Returns `IdError` if the identifier is empty or contains the key delimiter.
pub fn validate_id(raw: &str) -> Result<(), IdError> {
    if raw.is_empty() {
        return Err(IdError::Empty);
    }
    if raw.contains(KEY_DELIMITER) {
        return Err(IdError::ReservedCharacter(raw.to_string()));
    }
    Ok(())
}

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an ID from a raw string without validation.
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Checks that the ID can be used as a ledger key component.
            ///
            /// # Errors
            ///
            /// Returns `IdError` if the ID is empty or contains the key delimiter.
            pub fn validate(&self) -> Result<(), IdError> {
                validate_id(&self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                validate_id(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id!(ContractId, "Unique identifier for an employment contract.");
typed_id!(AdvanceRequestId, "Unique identifier for an advance request.");
typed_id!(PaymentId, "Derived identifier for a payment record.");
typed_id!(
    SettlementId,
    "Derived, channel-prefixed identifier for a settlement record."
);
