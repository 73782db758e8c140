//! Fixtures shared by unit tests.

use paysettle_shared::types::{ContractId, Currency};
use rust_decimal::Decimal;

use crate::contract::{Contract, ContractService, NewContract};
use crate::gateway::LedgerGateway;

pub(crate) fn new_contract(id: &str, salary: Decimal, variable_pay: Decimal) -> NewContract {
    NewContract {
        id: ContractId::new(id),
        employer: "Acme".into(),
        employee: "E1".into(),
        position: "Engineer".into(),
        salary,
        variable_pay,
        currency: Currency::EUR,
        account: "DE89370400440532013000".into(),
    }
}

pub(crate) fn contract(id: &str, salary: Decimal, variable_pay: Decimal) -> Contract {
    new_contract(id, salary, variable_pay).into_contract()
}

pub(crate) fn seed_contract<G: LedgerGateway + ?Sized>(
    ledger: &mut G,
    id: &str,
    salary: Decimal,
    variable_pay: Decimal,
) -> Contract {
    ContractService::create(ledger, new_contract(id, salary, variable_pay)).unwrap()
}
