//! Advance request types.

use chrono::{DateTime, Utc};
use paysettle_shared::types::{AdvanceRequestId, ContractId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gateway::codec::{DocType, Document};

/// Status of an advance request.
///
/// ```text
/// Pending ──approve──> Approved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceStatus {
    /// Awaiting approval.
    Pending,
    /// Approved and paid out. Terminal.
    Approved,
}

impl AdvanceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for AdvanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An employee's request for an advance on payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    /// Caller-supplied identifier, also the ledger key.
    pub id: AdvanceRequestId,
    /// Contract the advance is drawn against.
    pub contract_id: ContractId,
    /// Requesting employee.
    pub employee: String,
    /// Requested amount.
    pub amount: Decimal,
    /// Current status.
    pub status: AdvanceStatus,
    /// Invocation time of the request.
    pub requested_at: DateTime<Utc>,
    /// Invocation time of the approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl AdvanceRequest {
    /// Returns true if the request still awaits approval.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == AdvanceStatus::Pending
    }
}

impl Document for AdvanceRequest {
    const DOC_TYPE: DocType = DocType::AdvanceRequest;
}
