//! Payroll disbursement service.
//!
//! Every payment is checked against the contract's current compensation,
//! read fresh within the invocation.

use paysettle_shared::types::ContractId;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::types::{Payment, PaymentType};
use crate::contract::ContractService;
use crate::error::{PayrollError, ensure_employee, ensure_positive};
use crate::gateway::{LedgerGateway, codec};
use crate::history::PaymentHistory;
use crate::payroll::{PayrollPeriod, PayrollPolicy, is_zero_timestamp};

/// Authorizes and records regular and advance payments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentService {
    policy: PayrollPolicy,
}

impl PaymentService {
    /// Creates a service enforcing `policy`.
    #[must_use]
    pub fn new(policy: PayrollPolicy) -> Self {
        Self { policy }
    }

    /// Authorizes and records a payment to `employee` under the contract.
    ///
    /// # Arguments
    ///
    /// * `ledger` - The invocation to read and write through
    /// * `contract_id` - Contract the payment is made under
    /// * `employee` - Employee credited
    /// * `amount` - Amount to pay
    /// * `payment_type` - `Regular` or `Advance`
    ///
    /// # Returns
    ///
    /// The recorded payment, stamped with the invocation time.
    ///
    /// # Errors
    ///
    /// * `AlreadyPaidThisPeriod` if a Regular payment follows a credit in the same calendar month
    /// * `PaymentLimitExceeded` if `amount` exceeds the payment cap
    /// * `ContractNotFound` / `ContractInactive` if the contract cannot be paid
    /// * `UnsupportedPaymentType` for withdrawals
    pub fn process<G>(
        &self,
        ledger: &mut G,
        contract_id: &ContractId,
        employee: &str,
        amount: Decimal,
        payment_type: PaymentType,
    ) -> Result<Payment, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        if !payment_type.is_credit() {
            return Err(PayrollError::UnsupportedPaymentType(payment_type));
        }
        ensure_positive(amount)?;
        ensure_employee(employee)?;

        let contract = ContractService::get_active(ledger, contract_id)?;
        let now = ledger.tx_timestamp();

        if payment_type == PaymentType::Regular {
            let last = PaymentHistory::last_payment_date(ledger, contract_id)?;
            let period = PayrollPeriod::of(&now);
            if !is_zero_timestamp(&last) && period.contains(&last) {
                warn!(
                    contract_id = %contract_id,
                    %period,
                    %last,
                    "regular payment already made this period"
                );
                return Err(PayrollError::AlreadyPaidThisPeriod {
                    contract_id: contract_id.clone(),
                    period,
                });
            }
        }

        let limit = self.policy.payment_limit(&contract);
        if amount > limit {
            warn!(contract_id = %contract_id, %amount, %limit, "payment limit exceeded");
            return Err(PayrollError::PaymentLimitExceeded { amount, limit });
        }

        let payment = Payment::new(contract_id, employee, amount, now, payment_type);
        record(ledger, &payment)?;

        info!(
            payment_id = %payment.id,
            contract_id = %contract_id,
            employee,
            %amount,
            payment_type = %payment_type,
            "payment recorded"
        );
        Ok(payment)
    }
}

/// Writes a payment under its composite key, refusing to overwrite.
pub(crate) fn record<G>(ledger: &mut G, payment: &Payment) -> Result<(), PayrollError>
where
    G: LedgerGateway + ?Sized,
{
    let key = payment.ledger_key()?;
    if ledger.get(&key)?.is_some() {
        warn!(payment_id = %payment.id, "payment key already taken");
        return Err(PayrollError::RecordAlreadyExists(payment.id.to_string()));
    }
    codec::write(ledger, &key, payment)
}
