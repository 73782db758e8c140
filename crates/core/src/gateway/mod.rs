//! Ledger gateway: the key-value contract every service reads and writes through.
//!
//! The ledger substrate owns durability, replication and commit ordering.
//! Services only see one invocation's view of it through [`LedgerGateway`].
//!
//! # Modules
//!
//! - `error` - Substrate failures
//! - `key` - Composite key construction and decomposition
//! - `codec` - Record encoding to and from ledger values
//! - `memory` - In-process substrate with optimistic concurrency control

pub mod codec;
pub mod error;
pub mod key;
pub mod memory;

use chrono::{DateTime, Utc};

pub use error::GatewayError;
pub use key::{create_composite_key, split_composite_key};
pub use memory::{Invocation, MemoryLedger};

/// One `(key, value)` pair yielded by a scan.
pub type Entry = (String, Vec<u8>);

/// Finite, lazily consumed sequence of scan results.
pub type StateIter<'a> = Box<dyn Iterator<Item = Result<Entry, GatewayError>> + 'a>;

/// Key-value view of the ledger for a single invocation.
///
/// Writes are visible to later reads of the same invocation. Whether they
/// become visible to anyone else is decided by the substrate at commit.
pub trait LedgerGateway {
    /// Point read. `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError>;

    /// Upsert.
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), GatewayError>;

    /// Removes a key.
    fn delete(&mut self, key: &str) -> Result<(), GatewayError>;

    /// Lexicographic scan over `[start, end)`. An empty `end` is unbounded.
    fn scan_range(&self, start: &str, end: &str) -> Result<StateIter<'_>, GatewayError>;

    /// Scan of every composite key under `namespace` whose leading
    /// attributes equal `attributes`.
    fn scan_by_prefix(
        &self,
        namespace: &str,
        attributes: &[&str],
    ) -> Result<StateIter<'_>, GatewayError>;

    /// Decomposes a composite key into its namespace and attributes.
    fn split_key(&self, key: &str) -> Result<(String, Vec<String>), GatewayError> {
        split_composite_key(key)
    }

    /// Time of the current invocation.
    fn tx_timestamp(&self) -> DateTime<Utc>;

    /// Identifier of the current invocation.
    fn tx_id(&self) -> &str;
}
