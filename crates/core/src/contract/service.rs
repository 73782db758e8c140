//! Contract lifecycle service.
//!
//! Contracts live under their own ID in the flat key space.

use paysettle_shared::types::ContractId;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::types::{Contract, ContractStatus, NewContract};
use crate::error::{PayrollError, ensure_employee};
use crate::gateway::key::is_composite_key;
use crate::gateway::{LedgerGateway, codec};

/// Stateless service for creating, reading and retiring contracts.
pub struct ContractService;

impl ContractService {
    /// Returns true if any record exists under `id`.
    ///
    /// Does not distinguish a deleted contract from one never created.
    pub fn exists<G>(ledger: &G, id: &ContractId) -> Result<bool, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        id.validate()?;
        Ok(ledger.get(id.as_str())?.is_some())
    }

    /// Creates a new Active contract.
    ///
    /// # Errors
    ///
    /// * `ContractAlreadyExists` if the ID is taken
    /// * `NegativeCompensation` if salary or variable pay is negative
    /// * `InvalidId` / `InvalidEmployee` if a name cannot be used in a key
    pub fn create<G>(ledger: &mut G, input: NewContract) -> Result<Contract, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        input.id.validate()?;
        ensure_employee(&input.employee)?;
        for (field, value) in [("salary", input.salary), ("variable_pay", input.variable_pay)] {
            if value < Decimal::ZERO {
                warn!(contract_id = %input.id, field, %value, "negative compensation rejected");
                return Err(PayrollError::NegativeCompensation { field, value });
            }
        }

        if Self::exists(ledger, &input.id)? {
            warn!(contract_id = %input.id, "contract already exists");
            return Err(PayrollError::ContractAlreadyExists(input.id));
        }

        let contract = input.into_contract();
        codec::write(ledger, contract.id.as_str(), &contract)?;

        info!(
            contract_id = %contract.id,
            employer = %contract.employer,
            employee = %contract.employee,
            "contract created"
        );
        Ok(contract)
    }

    /// Reads a contract.
    ///
    /// # Errors
    ///
    /// * `InvalidId` if `id` cannot be used as a key
    /// * `ContractNotFound` if no contract is stored under `id`
    /// * `Corrupt` if the stored bytes do not decode
    pub fn get_by_id<G>(ledger: &G, id: &ContractId) -> Result<Contract, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        id.validate()?;
        codec::read(ledger, id.as_str())?
            .ok_or_else(|| PayrollError::ContractNotFound(id.clone()))
    }

    /// Reads a contract that payments may be made against.
    ///
    /// # Errors
    ///
    /// As [`get_by_id`](Self::get_by_id), plus `ContractInactive` if revoked.
    pub fn get_active<G>(ledger: &G, id: &ContractId) -> Result<Contract, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        let contract = Self::get_by_id(ledger, id)?;
        if !contract.is_active() {
            warn!(contract_id = %id, status = %contract.status, "contract is not active");
            return Err(PayrollError::ContractInactive(id.clone()));
        }
        Ok(contract)
    }

    /// Revokes a contract, keeping the record for audit.
    ///
    /// # Errors
    ///
    /// * `ContractNotFound` if absent
    /// * `InvalidTransition` if already revoked
    pub fn revoke<G>(ledger: &mut G, id: &ContractId) -> Result<Contract, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        let mut contract = Self::get_by_id(ledger, id)?;
        if contract.status == ContractStatus::Revoked {
            return Err(PayrollError::invalid_transition(
                contract.status,
                ContractStatus::Revoked,
            ));
        }

        contract.status = ContractStatus::Revoked;
        codec::write(ledger, id.as_str(), &contract)?;

        info!(contract_id = %id, "contract revoked");
        Ok(contract)
    }

    /// Removes a contract record entirely.
    ///
    /// # Errors
    ///
    /// `ContractNotFound` if no contract is stored under `id`.
    pub fn delete<G>(ledger: &mut G, id: &ContractId) -> Result<(), PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        Self::get_by_id(ledger, id)?;
        ledger.delete(id.as_str())?;
        info!(contract_id = %id, "contract deleted");
        Ok(())
    }

    /// Lists contracts whose IDs fall in `[start, end)`; empty `end` is unbounded.
    ///
    /// Other records sharing the key range are skipped.
    pub fn list<G>(ledger: &G, start: &str, end: &str) -> Result<Vec<Contract>, PayrollError>
    where
        G: LedgerGateway + ?Sized,
    {
        let mut contracts = Vec::new();
        for entry in ledger.scan_range(start, end)? {
            let (key, value) = entry?;
            if is_composite_key(&key) {
                continue;
            }
            if let Some(contract) = codec::decode::<Contract>(&key, &value)? {
                contracts.push(contract);
            }
        }
        Ok(contracts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryLedger;
    use crate::test_support::new_contract;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_then_exists() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        let id = ContractId::new("C1");
        assert!(!ContractService::exists(&tx, &id).unwrap());

        let contract =
            ContractService::create(&mut tx, new_contract("C1", dec!(1000), dec!(200))).unwrap();
        assert_eq!(contract.status, ContractStatus::Active);
        assert!(ContractService::exists(&tx, &id).unwrap());
    }

    #[test]
    fn test_create_twice_fails() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        ContractService::create(&mut tx, new_contract("C1", dec!(1000), dec!(200))).unwrap();
        let err =
            ContractService::create(&mut tx, new_contract("C1", dec!(5), dec!(0))).unwrap_err();
        assert!(matches!(err, PayrollError::ContractAlreadyExists(_)));
        assert_eq!(
            ContractService::get_by_id(&tx, &ContractId::new("C1")).unwrap().salary,
            dec!(1000)
        );
    }

    #[test]
    fn test_create_rejects_negative_compensation() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        let err = ContractService::create(&mut tx, new_contract("C1", dec!(1000), dec!(-1)))
            .unwrap_err();
        assert!(matches!(
            err,
            PayrollError::NegativeCompensation { field: "variable_pay", .. }
        ));
        assert!(!ContractService::exists(&tx, &ContractId::new("C1")).unwrap());
    }

    #[test]
    fn test_create_rejects_bad_identifiers() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        assert!(matches!(
            ContractService::create(&mut tx, new_contract("", dec!(1), dec!(0))),
            Err(PayrollError::InvalidId(_))
        ));

        let mut input = new_contract("C2", dec!(1), dec!(0));
        input.employee = String::new();
        assert!(matches!(
            ContractService::create(&mut tx, input),
            Err(PayrollError::InvalidEmployee(_))
        ));
    }

    #[test]
    fn test_get_missing_contract() {
        let ledger = MemoryLedger::new();
        let tx = ledger.begin().unwrap();
        let err = ContractService::get_by_id(&tx, &ContractId::new("nope")).unwrap_err();
        assert!(matches!(err, PayrollError::ContractNotFound(_)));
    }

    #[test]
    fn test_empty_id_is_a_validation_error() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        let empty = ContractId::new("");

        let errors = [
            ContractService::exists(&tx, &empty).unwrap_err(),
            ContractService::get_by_id(&tx, &empty).unwrap_err(),
            ContractService::get_active(&tx, &empty).unwrap_err(),
            ContractService::revoke(&mut tx, &empty).unwrap_err(),
            ContractService::delete(&mut tx, &empty).unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, PayrollError::InvalidId(_)));
            assert_eq!(err.error_code(), "VALIDATION_ERROR");
        }
    }

    #[test]
    fn test_get_corrupt_contract() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        tx.put("C1", b"{not json".to_vec()).unwrap();
        let err = ContractService::get_by_id(&tx, &ContractId::new("C1")).unwrap_err();
        assert!(matches!(err, PayrollError::Corrupt { .. }));
    }

    #[test]
    fn test_revoke_keeps_record() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        let id = ContractId::new("C1");
        ContractService::create(&mut tx, new_contract("C1", dec!(1000), dec!(200))).unwrap();

        let revoked = ContractService::revoke(&mut tx, &id).unwrap();
        assert_eq!(revoked.status, ContractStatus::Revoked);
        assert!(ContractService::exists(&tx, &id).unwrap());
        assert!(matches!(
            ContractService::get_active(&tx, &id),
            Err(PayrollError::ContractInactive(_))
        ));
        assert!(matches!(
            ContractService::revoke(&mut tx, &id),
            Err(PayrollError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_revoke_missing_contract() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        assert!(matches!(
            ContractService::revoke(&mut tx, &ContractId::new("C9")),
            Err(PayrollError::ContractNotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_record() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        let id = ContractId::new("C1");
        ContractService::create(&mut tx, new_contract("C1", dec!(1000), dec!(200))).unwrap();
        ContractService::delete(&mut tx, &id).unwrap();
        assert!(!ContractService::exists(&tx, &id).unwrap());
        assert!(matches!(
            ContractService::delete(&mut tx, &id),
            Err(PayrollError::ContractNotFound(_))
        ));
    }

    #[test]
    fn test_list_skips_other_records() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        ContractService::create(&mut tx, new_contract("C1", dec!(1000), dec!(0))).unwrap();
        ContractService::create(&mut tx, new_contract("C2", dec!(2000), dec!(0))).unwrap();
        ContractService::create(&mut tx, new_contract("D1", dec!(3000), dec!(0))).unwrap();
        crate::advance::AdvanceService::new(crate::payroll::PayrollPolicy::default())
            .request(&mut tx, &"C15".into(), &ContractId::new("C1"), "E1", dec!(10))
            .unwrap();

        let ids: Vec<String> = ContractService::list(&tx, "C", "D")
            .unwrap()
            .into_iter()
            .map(|c| c.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["C1", "C2"]);
        assert_eq!(ContractService::list(&tx, "", "").unwrap().len(), 3);
    }
}
