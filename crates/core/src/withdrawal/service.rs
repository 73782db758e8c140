//! Withdrawal processing.
//!
//! A withdrawal draws on the employee's most recent credit. Earlier
//! withdrawals against the same credit reduce what is left of it.

use paysettle_shared::types::ContractId;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::contract::ContractService;
use crate::error::{PayrollError, ensure_employee, ensure_positive};
use crate::gateway::LedgerGateway;
use crate::history::PaymentHistory;
use crate::payment::service::record;
use crate::payment::{Payment, PaymentType};

/// Authorizes and records withdrawals.
pub struct WithdrawalService;

impl WithdrawalService {
    /// Withdraws `amount` from the employee's most recent credit.
    ///
    /// The contract only has to exist; a revoked contract's credits stay
    /// withdrawable.
    ///
    /// # Errors
    ///
    /// * `ContractNotFound` if the contract does not exist
    /// * `NoPaymentHistory` if the employee was never credited
    /// * `InsufficientCredit` if `amount` exceeds what remains of the credit
    pub fn withdraw<G>(
        ledger: &mut G,
        contract_id: &ContractId,
        employee: &str,
        amount: Decimal,
    ) -> Result<Payment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        ensure_positive(amount)?;
        ensure_employee(employee)?;
        ContractService::get_by_id(ledger, contract_id)?;

        let credit = PaymentHistory::last_payment(ledger, contract_id, employee)?;
        let withdrawn =
            PaymentHistory::withdrawn_against(ledger, contract_id, employee, &credit.id)?;
        let available = credit.amount - withdrawn;
        if amount > available {
            warn!(
                contract_id = %contract_id,
                employee,
                credit_id = %credit.id,
                %amount,
                %available,
                "insufficient credit"
            );
            return Err(PayrollError::InsufficientCredit {
                requested: amount,
                available,
            });
        }

        let withdrawal = Payment::new(
            contract_id,
            employee,
            amount,
            ledger.tx_timestamp(),
            PaymentType::Withdrawal,
        )
        .drawn_on(credit.id.clone());
        record(ledger, &withdrawal)?;

        info!(
            payment_id = %withdrawal.id,
            credit_id = %credit.id,
            contract_id = %contract_id,
            employee,
            %amount,
            remaining = %(available - amount),
            "withdrawal recorded"
        );
        Ok(withdrawal)
    }
}
