//! Property-based tests for the payment history index.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::index::PaymentHistory;
use crate::gateway::{MemoryLedger, codec};
use crate::payment::{Payment, PaymentType};
use crate::payroll::zero_timestamp;
use paysettle_shared::types::ContractId;

/// Strategy for timestamps with nanosecond precision between 2000 and 2100.
fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..4_102_444_800i64, 0u32..1_000_000_000u32)
        .prop_map(|(secs, nanos)| DateTime::from_timestamp(secs, nanos).unwrap())
}

/// Strategy for a set of distinct payment timestamps.
fn timestamps() -> impl Strategy<Value = Vec<DateTime<Utc>>> {
    prop::collection::btree_set(timestamp(), 0..20).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The last payment date is exactly the maximum embedded timestamp.
    #[test]
    fn prop_last_payment_date_is_max(dates in timestamps(), employees in 1usize..4) {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        let contract = ContractId::new("C1");

        for (i, date) in dates.iter().enumerate() {
            let employee = format!("E{}", i % employees);
            let payment =
                Payment::new(&contract, &employee, Decimal::ONE, *date, PaymentType::Regular);
            codec::write(&mut tx, &payment.ledger_key().unwrap(), &payment).unwrap();
        }

        let expected = dates.iter().max().copied().unwrap_or_else(zero_timestamp);
        prop_assert_eq!(PaymentHistory::last_payment_date(&tx, &contract).unwrap(), expected);
    }

    /// The last payment of an employee carries the latest of that employee's dates.
    #[test]
    fn prop_last_payment_is_latest_for_employee(dates in timestamps()) {
        prop_assume!(!dates.is_empty());
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin().unwrap();
        let contract = ContractId::new("C1");

        for date in &dates {
            let payment = Payment::new(&contract, "E1", Decimal::ONE, *date, PaymentType::Advance);
            codec::write(&mut tx, &payment.ledger_key().unwrap(), &payment).unwrap();
        }

        let last = PaymentHistory::last_payment(&tx, &contract, "E1").unwrap();
        prop_assert_eq!(Some(last.date), dates.iter().max().copied());
    }
}
