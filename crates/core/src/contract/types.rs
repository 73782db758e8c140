//! Contract domain types.

use paysettle_shared::types::{ContractId, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gateway::codec::{DocType, Document};

/// Contract status.
///
/// The only transition is Active → Revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Contract is in force; payments may be made against it.
    Active,
    /// Contract has been revoked; kept for audit.
    Revoked,
}

impl ContractStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment contract between an employer and an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique identifier, also the ledger key.
    pub id: ContractId,
    /// Name of the employer.
    pub employer: String,
    /// Name of the employee.
    pub employee: String,
    /// Position held by the employee.
    pub position: String,
    /// Fixed compensation per period.
    pub salary: Decimal,
    /// Variable compensation per period.
    pub variable_pay: Decimal,
    /// Currency the employee is paid in.
    pub currency: Currency,
    /// Reference to the employee's settlement account.
    pub account: String,
    /// Current status.
    pub status: ContractStatus,
}

impl Contract {
    /// Returns true if payments may be made against this contract.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }
}

impl Document for Contract {
    const DOC_TYPE: DocType = DocType::Contract;
}

/// Input for creating a contract.
#[derive(Debug, Clone)]
pub struct NewContract {
    /// Identifier to create the contract under.
    pub id: ContractId,
    /// Name of the employer.
    pub employer: String,
    /// Name of the employee.
    pub employee: String,
    /// Position held by the employee.
    pub position: String,
    /// Fixed compensation per period (must not be negative).
    pub salary: Decimal,
    /// Variable compensation per period (must not be negative).
    pub variable_pay: Decimal,
    /// Currency the employee is paid in.
    pub currency: Currency,
    /// Reference to the employee's settlement account.
    pub account: String,
}

impl NewContract {
    /// Builds the Active contract this input describes.
    #[must_use]
    pub fn into_contract(self) -> Contract {
        Contract {
            id: self.id,
            employer: self.employer,
            employee: self.employee,
            position: self.position,
            salary: self.salary,
            variable_pay: self.variable_pay,
            currency: self.currency,
            account: self.account,
            status: ContractStatus::Active,
        }
    }
}
