//! Cross-invocation behaviour: commit conflicts and substrate failures.

use chrono::{DateTime, TimeZone, Utc};
use paysettle_core::gateway::{Entry, StateIter};
use paysettle_core::{
    ContractService, GatewayError, LedgerGateway, MemoryLedger, NewContract, PaymentService,
    PaymentType, PayrollError, WithdrawalService,
};
use paysettle_shared::AppError;
use paysettle_shared::types::{ContractId, Currency};
use rust_decimal_macros::dec;

fn c1() -> ContractId {
    ContractId::new("C1")
}

fn seeded() -> MemoryLedger {
    let ledger = MemoryLedger::new();
    ledger
        .invoke(|tx| {
            ContractService::create(
                tx,
                NewContract {
                    id: c1(),
                    employer: "Acme Corp".into(),
                    employee: "E1".into(),
                    position: "Engineer".into(),
                    salary: dec!(1000),
                    variable_pay: dec!(200),
                    currency: Currency::EUR,
                    account: "ACC-001".into(),
                },
            )
        })
        .unwrap();
    ledger
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, day, 9, 0, 0).unwrap()
}

#[test]
fn concurrent_regular_payments_conflict_at_commit() {
    let ledger = seeded();
    let service = PaymentService::default();

    let mut first = ledger.begin_at(at(1)).unwrap();
    let mut second = ledger.begin_at(at(2)).unwrap();
    service.process(&mut first, &c1(), "E1", dec!(1200), PaymentType::Regular).unwrap();
    service.process(&mut second, &c1(), "E1", dec!(1200), PaymentType::Regular).unwrap();

    first.commit().unwrap();
    let conflict = second.commit().unwrap_err();
    assert!(matches!(conflict, GatewayError::Conflict { .. }));

    let app: AppError = PayrollError::from(conflict).into();
    assert_eq!(app.error_code(), "COMMIT_CONFLICT");
    assert!(app.is_retryable());

    // Resubmitting sees the committed payment and is refused on its merits.
    let retry = ledger.invoke_at(at(2), |tx| {
        service.process(tx, &c1(), "E1", dec!(1200), PaymentType::Regular)
    });
    assert!(matches!(retry, Err(PayrollError::AlreadyPaidThisPeriod { .. })));
}

#[test]
fn concurrent_withdrawals_cannot_overdraw() {
    let ledger = seeded();
    ledger
        .invoke_at(at(1), |tx| {
            PaymentService::default().process(tx, &c1(), "E1", dec!(2000), PaymentType::Regular)
        })
        .unwrap();

    let mut first = ledger.begin_at(at(3)).unwrap();
    let mut second = ledger.begin_at(at(4)).unwrap();
    WithdrawalService::withdraw(&mut first, &c1(), "E1", dec!(1500)).unwrap();
    WithdrawalService::withdraw(&mut second, &c1(), "E1", dec!(1500)).unwrap();

    first.commit().unwrap();
    assert!(second.commit().is_err());
}

/// Gateway whose writes always fail, wrapping a working invocation for reads.
struct ReadOnlyLedger<G> {
    inner: G,
}

impl<G: LedgerGateway> LedgerGateway for ReadOnlyLedger<G> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        self.inner.get(key)
    }

    fn put(&mut self, _key: &str, _value: Vec<u8>) -> Result<(), GatewayError> {
        Err(GatewayError::unavailable("ledger is read-only"))
    }

    fn delete(&mut self, _key: &str) -> Result<(), GatewayError> {
        Err(GatewayError::unavailable("ledger is read-only"))
    }

    fn scan_range(&self, start: &str, end: &str) -> Result<StateIter<'_>, GatewayError> {
        self.inner.scan_range(start, end)
    }

    fn scan_by_prefix(
        &self,
        namespace: &str,
        attributes: &[&str],
    ) -> Result<StateIter<'_>, GatewayError> {
        self.inner.scan_by_prefix(namespace, attributes)
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.inner.tx_timestamp()
    }

    fn tx_id(&self) -> &str {
        self.inner.tx_id()
    }
}

#[test]
fn substrate_write_failure_surfaces_as_gateway_failure() {
    let ledger = seeded();
    let mut readonly = ReadOnlyLedger {
        inner: ledger.begin().unwrap(),
    };

    let contract = ContractService::get_by_id(&readonly, &c1()).unwrap();
    assert_eq!(contract.id, c1());

    let err = PaymentService::default()
        .process(&mut readonly, &c1(), "E1", dec!(100), PaymentType::Advance)
        .unwrap_err();
    let app: AppError = err.into();
    assert_eq!(app.error_code(), "GATEWAY_FAILURE");
    assert!(!app.is_retryable());
}

/// Scans that break partway through.
struct BrokenScan<G> {
    inner: G,
}

impl<G: LedgerGateway> LedgerGateway for BrokenScan<G> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), GatewayError> {
        self.inner.put(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), GatewayError> {
        self.inner.delete(key)
    }

    fn scan_range(&self, start: &str, end: &str) -> Result<StateIter<'_>, GatewayError> {
        self.inner.scan_range(start, end)
    }

    fn scan_by_prefix(
        &self,
        namespace: &str,
        attributes: &[&str],
    ) -> Result<StateIter<'_>, GatewayError> {
        let entries: Vec<Result<Entry, GatewayError>> = self
            .inner
            .scan_by_prefix(namespace, attributes)?
            .take(1)
            .chain(std::iter::once(Err(GatewayError::unavailable("peer dropped"))))
            .collect();
        Ok(Box::new(entries.into_iter()))
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.inner.tx_timestamp()
    }

    fn tx_id(&self) -> &str {
        self.inner.tx_id()
    }
}

#[test]
fn scan_failure_aborts_history_lookup() {
    let ledger = seeded();
    let mut broken = BrokenScan {
        inner: ledger.begin().unwrap(),
    };
    let err = WithdrawalService::withdraw(&mut broken, &c1(), "E1", dec!(1)).unwrap_err();
    assert!(matches!(err, PayrollError::Gateway(GatewayError::Unavailable(_))));
}
