//! Advance request and approval.

use paysettle_shared::types::{AdvanceRequestId, ContractId};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::types::{AdvanceRequest, AdvanceStatus};
use crate::contract::ContractService;
use crate::error::{PayrollError, ensure_employee, ensure_positive};
use crate::gateway::{LedgerGateway, codec};
use crate::payment::{Payment, PaymentService, PaymentType};
use crate::payroll::PayrollPolicy;

/// Outcome of approving an advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedAdvance {
    /// The request, now Approved.
    pub request: AdvanceRequest,
    /// The Advance payment made for it.
    pub payment: Payment,
}

/// Runs the advance workflow under a payroll policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvanceService {
    policy: PayrollPolicy,
    payments: PaymentService,
}

impl AdvanceService {
    /// Creates a service enforcing `policy`.
    #[must_use]
    pub fn new(policy: PayrollPolicy) -> Self {
        Self {
            policy,
            payments: PaymentService::new(policy),
        }
    }

    /// Files a Pending advance request.
    ///
    /// The cap is checked before anything is written.
    ///
    /// # Errors
    ///
    /// * `AdvanceLimitExceeded` if `amount` exceeds the advance cap
    /// * `AdvanceRequestAlreadyExists` if `request_id` is taken
    /// * `ContractNotFound` / `ContractInactive` if the contract cannot be drawn on
    pub fn request<G>(
        &self,
        ledger: &mut G,
        request_id: &AdvanceRequestId,
        contract_id: &ContractId,
        employee: &str,
        amount: Decimal,
    ) -> Result<AdvanceRequest, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        request_id.validate()?;
        ensure_employee(employee)?;
        ensure_positive(amount)?;

        let contract = ContractService::get_active(ledger, contract_id)?;
        let limit = self.policy.advance_limit(&contract);
        if amount > limit {
            warn!(
                request_id = %request_id,
                contract_id = %contract_id,
                %amount,
                %limit,
                "advance limit exceeded"
            );
            return Err(PayrollError::AdvanceLimitExceeded { amount, limit });
        }

        if ledger.get(request_id.as_str())?.is_some() {
            warn!(request_id = %request_id, "advance request already exists");
            return Err(PayrollError::AdvanceRequestAlreadyExists(request_id.clone()));
        }

        let request = AdvanceRequest {
            id: request_id.clone(),
            contract_id: contract_id.clone(),
            employee: employee.to_string(),
            amount,
            status: AdvanceStatus::Pending,
            requested_at: ledger.tx_timestamp(),
            approved_at: None,
        };
        codec::write(ledger, request_id.as_str(), &request)?;

        info!(
            request_id = %request_id,
            contract_id = %contract_id,
            employee,
            %amount,
            "advance requested"
        );
        Ok(request)
    }

    /// Approves a Pending request and pays it out.
    ///
    /// The status write and the payment belong to the same invocation, so a
    /// failed payment discards the approval too.
    ///
    /// # Errors
    ///
    /// * `AdvanceRequestNotFound` if absent
    /// * `InvalidTransition` if already approved
    /// * any error of [`PaymentService::process`]
    pub fn approve<G>(
        &self,
        ledger: &mut G,
        request_id: &AdvanceRequestId,
    ) -> Result<ApprovedAdvance, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        let mut request = self.get(ledger, request_id)?;
        if !request.is_pending() {
            warn!(request_id = %request_id, status = %request.status, "advance not pending");
            return Err(PayrollError::invalid_transition(
                request.status,
                AdvanceStatus::Approved,
            ));
        }

        request.status = AdvanceStatus::Approved;
        request.approved_at = Some(ledger.tx_timestamp());
        codec::write(ledger, request_id.as_str(), &request)?;

        let payment = self.payments.process(
            ledger,
            &request.contract_id,
            &request.employee,
            request.amount,
            PaymentType::Advance,
        )?;

        info!(
            request_id = %request_id,
            payment_id = %payment.id,
            amount = %request.amount,
            "advance approved"
        );
        Ok(ApprovedAdvance { request, payment })
    }

    /// Reads an advance request.
    ///
    /// # Errors
    ///
    /// * `InvalidId` if `request_id` cannot be used as a key
    /// * `AdvanceRequestNotFound` if no request is stored under `request_id`
    pub fn get<G>(
        &self,
        ledger: &G,
        request_id: &AdvanceRequestId,
    ) -> Result<AdvanceRequest, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        request_id.validate()?;
        codec::read(ledger, request_id.as_str())?
            .ok_or_else(|| PayrollError::AdvanceRequestNotFound(request_id.clone()))
    }
}
