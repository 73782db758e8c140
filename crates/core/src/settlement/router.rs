//! Settlement dispatch and completion.

use paysettle_shared::types::{ContractId, Money, SettlementId};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::types::{SettlementChannel, SettlementPayment, SettlementStatus};
use crate::contract::ContractService;
use crate::error::{PayrollError, ensure_employee, ensure_positive};
use crate::gateway::key::prefix_range;
use crate::gateway::{LedgerGateway, codec};
use crate::payment::types::unix_nanos;

/// Routes payments through their settlement channel.
pub struct SettlementRouter;

impl SettlementRouter {
    /// Creates a Pending settlement payment on `channel`.
    ///
    /// The amount is denominated in the contract currency.
    ///
    /// # Errors
    ///
    /// * `ContractNotFound` / `ContractInactive` if the contract cannot be paid
    /// * `RecordAlreadyExists` if the derived ID is taken
    pub fn dispatch<G>(
        ledger: &mut G,
        contract_id: &ContractId,
        employee: &str,
        amount: Decimal,
        channel: SettlementChannel,
    ) -> Result<SettlementPayment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        ensure_positive(amount)?;
        ensure_employee(employee)?;
        let contract = ContractService::get_active(ledger, contract_id)?;

        let now = ledger.tx_timestamp();
        let id = SettlementId::new(format!(
            "{}_{}_{}_{}",
            channel.id_prefix(),
            contract_id,
            employee,
            unix_nanos(&now)
        ));
        if ledger.get(id.as_str())?.is_some() {
            warn!(settlement_id = %id, "settlement key already taken");
            return Err(PayrollError::RecordAlreadyExists(id.into_inner()));
        }

        let payment = SettlementPayment {
            id,
            channel,
            contract_id: contract_id.clone(),
            employee: employee.to_string(),
            amount: Money::new(amount, contract.currency),
            status: SettlementStatus::Pending,
            hops: Vec::new(),
            created_at: now,
            completed_at: None,
        };
        codec::write(ledger, payment.id.as_str(), &payment)?;

        info!(
            settlement_id = %payment.id,
            %channel,
            contract_id = %contract_id,
            employee,
            amount = %payment.amount,
            "settlement dispatched"
        );
        Ok(payment)
    }

    /// Approves a Pending cross-border payment and completes its transfer.
    ///
    /// # Errors
    ///
    /// * `SettlementNotFound` if absent
    /// * `ChannelMismatch` if the record is a local payment
    /// * `InvalidTransition` if the record is not Pending
    pub fn approve_cross_border<G>(
        ledger: &mut G,
        id: &SettlementId,
    ) -> Result<SettlementPayment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        Self::complete(ledger, id, Some(SettlementChannel::CrossBorder))
    }

    /// Approves a Pending local payment and completes its transfer.
    ///
    /// # Errors
    ///
    /// As [`approve_cross_border`](Self::approve_cross_border), with the
    /// channels swapped.
    pub fn process_local_payment<G>(
        ledger: &mut G,
        id: &SettlementId,
    ) -> Result<SettlementPayment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        Self::complete(ledger, id, Some(SettlementChannel::Local))
    }

    /// Approves and completes a Pending payment on whichever channel it was dispatched to.
    pub fn approve<G>(ledger: &mut G, id: &SettlementId) -> Result<SettlementPayment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        Self::complete(ledger, id, None)
    }

    /// Reads a settlement payment.
    ///
    /// # Errors
    ///
    /// * `InvalidId` if `id` cannot be used as a key
    /// * `SettlementNotFound` if no settlement record is stored under `id`
    pub fn get<G>(ledger: &G, id: &SettlementId) -> Result<SettlementPayment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        id.validate()?;
        codec::read(ledger, id.as_str())?
            .ok_or_else(|| PayrollError::SettlementNotFound(id.clone()))
    }

    /// Lists every settlement payment on `channel`, in ID order.
    pub fn list<G>(
        ledger: &G,
        channel: SettlementChannel,
    ) -> Result<Vec<SettlementPayment>, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        let (start, end) = prefix_range(&format!("{}_", channel.id_prefix()));
        let mut payments = Vec::new();
        for entry in ledger.scan_range(&start, &end)? {
            let (key, value) = entry?;
            match codec::decode::<SettlementPayment>(&key, &value)? {
                Some(payment) if payment.channel == channel => payments.push(payment),
                _ => {}
            }
        }
        Ok(payments)
    }

    /// Walks a Pending record through Approved to Completed and persists it once.
    fn complete<G>(
        ledger: &mut G,
        id: &SettlementId,
        expected: Option<SettlementChannel>,
    ) -> Result<SettlementPayment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        let mut payment = Self::get(ledger, id)?;
        if let Some(expected) = expected
            && payment.channel != expected
        {
            warn!(
                settlement_id = %id,
                %expected,
                actual = %payment.channel,
                "settlement channel mismatch"
            );
            return Err(PayrollError::ChannelMismatch {
                id: id.clone(),
                expected: expected.to_string(),
                actual: payment.channel.to_string(),
            });
        }

        payment.status = payment.status.transition(SettlementStatus::Approved)?;
        info!(settlement_id = %id, channel = %payment.channel, "settlement approved");

        for (step, hop) in payment.channel.hops().iter().enumerate() {
            info!(settlement_id = %id, step = step + 1, hop = ?hop, "{hop}");
            payment.hops.push(*hop);
        }

        payment.status = payment.status.transition(SettlementStatus::Completed)?;
        payment.completed_at = Some(ledger.tx_timestamp());
        codec::write(ledger, id.as_str(), &payment)?;

        info!(
            settlement_id = %id,
            channel = %payment.channel,
            amount = %payment.amount,
            "settlement completed"
        );
        Ok(payment)
    }
}
