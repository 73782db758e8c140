//! Payment records.
//!
//! Payments are write-once. Credits (regular and advance payments) are keyed
//! under [`PAYMENT_NAMESPACE`], withdrawals under [`WITHDRAWAL_NAMESPACE`];
//! both use `(contract, employee, timestamp)` attributes so a prefix scan can
//! narrow by contract or by contract and employee.

use chrono::{DateTime, SecondsFormat, Utc};
use paysettle_shared::types::{ContractId, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gateway::codec::{DocType, Document};
use crate::gateway::{GatewayError, create_composite_key};

/// Composite-key namespace for credited payments.
pub const PAYMENT_NAMESPACE: &str = "Payment";

/// Composite-key namespace for withdrawals.
pub const WITHDRAWAL_NAMESPACE: &str = "Withdrawal";

/// Kind of payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Periodic payroll payment.
    Regular,
    /// Payout of an approved advance request.
    Advance,
    /// Employee withdrawal against a credited payment.
    Withdrawal,
}

impl PaymentType {
    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Advance => "advance",
            Self::Withdrawal => "withdrawal",
        }
    }

    /// Returns true if this payment credits the employee.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Regular | Self::Advance)
    }

    /// Composite-key namespace records of this type are stored under.
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        if self.is_credit() {
            PAYMENT_NAMESPACE
        } else {
            WITHDRAWAL_NAMESPACE
        }
    }

    fn id_prefix(self) -> &'static str {
        if self.is_credit() { "PAY" } else { "WITHDRAW" }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded disbursement or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Derived identifier.
    pub id: PaymentId,
    /// Contract the payment is made under.
    pub contract_id: ContractId,
    /// Employee paid.
    pub employee: String,
    /// Amount paid or withdrawn.
    pub amount: Decimal,
    /// Invocation time the payment was recorded at.
    pub date: DateTime<Utc>,
    /// Kind of payment.
    pub payment_type: PaymentType,
    /// For withdrawals, the credit drawn on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_payment_id: Option<PaymentId>,
}

impl Payment {
    /// Builds a payment stamped with `date`, deriving its ID.
    #[must_use]
    pub fn new(
        contract_id: &ContractId,
        employee: &str,
        amount: Decimal,
        date: DateTime<Utc>,
        payment_type: PaymentType,
    ) -> Self {
        let id = PaymentId::new(format!(
            "{}_{}_{}_{}",
            payment_type.id_prefix(),
            contract_id,
            employee,
            unix_nanos(&date)
        ));
        Self {
            id,
            contract_id: contract_id.clone(),
            employee: employee.to_string(),
            amount,
            date,
            payment_type,
            source_payment_id: None,
        }
    }

    /// Sets the credit a withdrawal draws on.
    #[must_use]
    pub fn drawn_on(mut self, source: PaymentId) -> Self {
        self.source_payment_id = Some(source);
        self
    }

    /// Composite ledger key of this payment.
    pub fn ledger_key(&self) -> Result<String, GatewayError> {
        create_composite_key(
            self.payment_type.namespace(),
            &[
                self.contract_id.as_str(),
                &self.employee,
                &key_timestamp(&self.date),
            ],
        )
    }
}

impl Document for Payment {
    const DOC_TYPE: DocType = DocType::Payment;
}

/// Timestamp attribute embedded in payment keys (RFC 3339, nanoseconds, `Z`).
#[must_use]
pub fn key_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Nanoseconds since the Unix epoch, without the `i64` range limit.
pub(crate) fn unix_nanos(ts: &DateTime<Utc>) -> i128 {
    i128::from(ts.timestamp()) * 1_000_000_000 + i128::from(ts.timestamp_subsec_nanos())
}
