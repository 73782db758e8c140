//! Settlement domain types.

use chrono::{DateTime, Utc};
use paysettle_shared::types::{ContractId, Money, SettlementId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PayrollError;
use crate::gateway::codec::{DocType, Document};

/// Settlement pipeline a payment is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementChannel {
    /// Transfer via central banks with currency conversion.
    CrossBorder,
    /// Direct transfer between member banks.
    Local,
}

impl SettlementChannel {
    /// Returns the string representation of the channel.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrossBorder => "CrossBorder",
            Self::Local => "Local",
        }
    }

    /// Prefix of settlement IDs on this channel.
    #[must_use]
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::CrossBorder => "CROSS",
            Self::Local => "LOCAL",
        }
    }

    /// Hops a transfer on this channel goes through, in order.
    #[must_use]
    pub fn hops(&self) -> &'static [TransferHop] {
        match self {
            Self::CrossBorder => &[
                TransferHop::IntermediaryApproval,
                TransferHop::ConversionRequested,
                TransferHop::CurrencyConverted,
                TransferHop::RecipientCentralBankReceived,
                TransferHop::PayeeMemberBankCredited,
            ],
            Self::Local => &[TransferHop::InterbankTransfer, TransferHop::PayeeAccountCredited],
        }
    }
}

impl fmt::Display for SettlementChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementChannel {
    type Err = PayrollError;

    /// Parses a channel name, ignoring case and `-`/`_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "crossborder" => Ok(Self::CrossBorder),
            "local" => Ok(Self::Local),
            _ => Err(PayrollError::InvalidChannel(s.to_string())),
        }
    }
}

/// Status of a settlement payment.
///
/// ```text
/// Pending ──> Approved ──> Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Dispatched, awaiting approval.
    Pending,
    /// Approved, transfer in progress.
    Approved,
    /// Transfer completed. Terminal.
    Completed,
}

impl SettlementStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Completed => "completed",
        }
    }

    /// Returns true if `next` is the single step forward from this status.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Approved, Self::Completed)
        )
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless `next` is the single step forward.
    pub fn transition(self, next: Self) -> Result<Self, PayrollError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PayrollError::invalid_transition(self, next))
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulated inter-bank step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferHop {
    /// Intermediary central bank approves the transfer.
    IntermediaryApproval,
    /// Conversion requested from the forex bank.
    ConversionRequested,
    /// Forex bank converts into the payee currency.
    CurrencyConverted,
    /// Recipient central bank receives the converted amount.
    RecipientCentralBankReceived,
    /// Recipient central bank credits the payee's member bank.
    PayeeMemberBankCredited,
    /// Payer bank transfers to the payee bank.
    InterbankTransfer,
    /// Payee bank credits the payee's account.
    PayeeAccountCredited,
}

impl TransferHop {
    /// Human-readable description for logs.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::IntermediaryApproval => "intermediary central bank approved the transfer",
            Self::ConversionRequested => "currency conversion requested from forex bank",
            Self::CurrencyConverted => "forex bank converted the amount",
            Self::RecipientCentralBankReceived => "recipient central bank received the funds",
            Self::PayeeMemberBankCredited => {
                "recipient central bank credited the payee's member bank"
            }
            Self::InterbankTransfer => "payer bank transferred the funds to the payee bank",
            Self::PayeeAccountCredited => "payee bank credited the payee's account",
        }
    }
}

impl fmt::Display for TransferHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A payment routed through a settlement channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPayment {
    /// Channel-prefixed identifier, also the ledger key.
    pub id: SettlementId,
    /// Channel the payment is routed through.
    pub channel: SettlementChannel,
    /// Contract the payment is made under.
    pub contract_id: ContractId,
    /// Employee paid.
    pub employee: String,
    /// Amount in the contract currency.
    pub amount: Money,
    /// Current status.
    pub status: SettlementStatus,
    /// Hops completed, in order.
    pub hops: Vec<TransferHop>,
    /// Invocation time of dispatch.
    pub created_at: DateTime<Utc>,
    /// Invocation time of completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Document for SettlementPayment {
    const DOC_TYPE: DocType = DocType::Settlement;
}
