//! Record encoding to and from ledger values.
//!
//! Records are JSON objects led by a `doc_type` field, followed by the
//! record's own fields in declaration order, so re-encoding an unchanged
//! record is byte-identical. The flat key space holds several record kinds
//! side by side; `doc_type` tells them apart on read.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::LedgerGateway;
use crate::error::PayrollError;

/// Kind of record stored under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Employment contract.
    Contract,
    /// Advance request.
    AdvanceRequest,
    /// Credit or withdrawal payment.
    Payment,
    /// Settlement pipeline record.
    Settlement,
}

/// A record type persisted in the ledger.
pub trait Document: Serialize + DeserializeOwned {
    /// The `doc_type` written alongside the record.
    const DOC_TYPE: DocType;
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    doc_type: DocType,
    #[serde(flatten)]
    record: &'a T,
}

#[derive(Deserialize)]
struct Header {
    doc_type: Option<DocType>,
}

/// Encodes a record for storage.
pub fn encode<T: Document>(key: &str, record: &T) -> Result<Vec<u8>, PayrollError> {
    let envelope = Envelope {
        doc_type: T::DOC_TYPE,
        record,
    };
    serde_json::to_vec(&envelope).map_err(|e| PayrollError::corrupt(key, e.to_string()))
}

/// Decodes a stored value, or `None` if it holds a different kind of record.
pub fn decode<T: Document>(key: &str, bytes: &[u8]) -> Result<Option<T>, PayrollError> {
    let header: Header =
        serde_json::from_slice(bytes).map_err(|e| PayrollError::corrupt(key, e.to_string()))?;
    if header.doc_type != Some(T::DOC_TYPE) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|e| PayrollError::corrupt(key, e.to_string()))
}

/// Reads and decodes the record of type `T` under `key`, if any.
pub fn read<G, T>(ledger: &G, key: &str) -> Result<Option<T>, PayrollError>
where
    G: LedgerGateway + ?Sized,
    T: Document,
{
    match ledger.get(key)? {
        Some(bytes) => decode(key, &bytes),
        None => Ok(None),
    }
}

/// Encodes and writes `record` under `key`.
pub fn write<G, T>(ledger: &mut G, key: &str, record: &T) -> Result<(), PayrollError>
where
    G: LedgerGateway + ?Sized,
    T: Document,
{
    let bytes = encode(key, record)?;
    ledger.put(key, bytes)?;
    Ok(())
}
