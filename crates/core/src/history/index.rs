//! Last-payment lookups over the payment key space.

use chrono::{DateTime, Utc};
use paysettle_shared::types::{ContractId, PaymentId};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::PayrollError;
use crate::gateway::{LedgerGateway, codec};
use crate::payment::{PAYMENT_NAMESPACE, Payment, WITHDRAWAL_NAMESPACE};
use crate::payroll::zero_timestamp;

/// Position of the timestamp among a payment key's attributes.
const TIMESTAMP_ATTRIBUTE: usize = 2;

/// Read-only queries over recorded payments.
pub struct PaymentHistory;

impl PaymentHistory {
    /// Returns the latest timestamp embedded in any credit key of the contract.
    ///
    /// Only keys are inspected; record bodies are not decoded. Returns the
    /// zero timestamp when the contract has no credits.
    ///
    /// # Errors
    ///
    /// `Corrupt` if a key does not carry a parseable timestamp.
    pub fn last_payment_date<G>(
        ledger: &G,
        contract_id: &ContractId,
    ) -> Result<DateTime<Utc>, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        let mut latest = zero_timestamp();
        let mut scanned = 0usize;
        for entry in ledger.scan_by_prefix(PAYMENT_NAMESPACE, &[contract_id.as_str()])? {
            let (key, _) = entry?;
            let (_, attributes) = ledger.split_key(&key)?;
            let stamp = attributes
                .get(TIMESTAMP_ATTRIBUTE)
                .ok_or_else(|| PayrollError::corrupt(&key, "payment key has no timestamp"))?;
            let date = DateTime::parse_from_rfc3339(stamp)
                .map_err(|e| PayrollError::corrupt(&key, e.to_string()))?
                .with_timezone(&Utc);
            latest = latest.max(date);
            scanned += 1;
        }

        debug!(contract_id = %contract_id, scanned, %latest, "last payment date");
        Ok(latest)
    }

    /// Returns every credit to `employee` under the contract, oldest first.
    pub fn payments<G>(
        ledger: &G,
        contract_id: &ContractId,
        employee: &str,
    ) -> Result<Vec<Payment>, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        Self::collect(ledger, PAYMENT_NAMESPACE, contract_id, employee)
    }

    /// Returns the credit with the latest recorded date.
    ///
    /// # Errors
    ///
    /// `NoPaymentHistory` if the employee was never credited under the contract.
    pub fn last_payment<G>(
        ledger: &G,
        contract_id: &ContractId,
        employee: &str,
    ) -> Result<Payment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        Self::payments(ledger, contract_id, employee)?
            .pop()
            .ok_or_else(|| PayrollError::NoPaymentHistory {
                contract_id: contract_id.clone(),
                employee: employee.to_string(),
            })
    }

    /// Returns every withdrawal by `employee` under the contract, oldest first.
    pub fn withdrawals<G>(
        ledger: &G,
        contract_id: &ContractId,
        employee: &str,
    ) -> Result<Vec<Payment>, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        Self::collect(ledger, WITHDRAWAL_NAMESPACE, contract_id, employee)
    }

    /// Sums the withdrawals already drawn on the credit `source`.
    pub fn withdrawn_against<G>(
        ledger: &G,
        contract_id: &ContractId,
        employee: &str,
        source: &PaymentId,
    ) -> Result<Decimal, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        Ok(Self::withdrawals(ledger, contract_id, employee)?
            .iter()
            .filter(|w| w.source_payment_id.as_ref() == Some(source))
            .map(|w| w.amount)
            .sum())
    }

    fn collect<G>(
        ledger: &G,
        namespace: &str,
        contract_id: &ContractId,
        employee: &str,
    ) -> Result<Vec<Payment>, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        let mut payments = Vec::new();
        for entry in ledger.scan_by_prefix(namespace, &[contract_id.as_str(), employee])? {
            let (key, value) = entry?;
            if let Some(payment) = codec::decode::<Payment>(&key, &value)? {
                payments.push(payment);
            }
        }
        payments.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.as_str().cmp(b.id.as_str())));
        Ok(payments)
    }
}
