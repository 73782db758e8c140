//! Property-based tests for payroll arithmetic and periods.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::{PayrollCalculator, PayrollPolicy};
use super::period::PayrollPeriod;
use crate::test_support::contract;

/// Strategy for non-negative amounts (0.00 to 10,000,000.00).
fn compensation() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for positive multipliers (0.1 to 10.0).
fn multiplier() -> impl Strategy<Value = Decimal> {
    (1i64..=100i64).prop_map(|v| Decimal::new(v, 1))
}

/// Strategy for timestamps between 1970 and 2100.
fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800i64).prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Monthly payment is exactly salary plus variable pay.
    #[test]
    fn prop_monthly_payment_is_exact_sum(salary in compensation(), variable in compensation()) {
        let c = contract("C1", salary, variable);
        prop_assert_eq!(PayrollCalculator::monthly_payment(&c), salary + variable);
    }

    /// Caps scale linearly with the configured multiplier.
    #[test]
    fn prop_limits_scale_with_multiplier(
        salary in compensation(),
        variable in compensation(),
        advance in multiplier(),
        payment in multiplier(),
    ) {
        let c = contract("C1", salary, variable);
        let policy = PayrollPolicy {
            advance_limit_multiplier: advance,
            payment_limit_multiplier: payment,
        };
        prop_assert_eq!(policy.advance_limit(&c), (salary + variable) * advance);
        prop_assert_eq!(policy.payment_limit(&c), (salary + variable) * payment);
    }

    /// Two instants share a period exactly when year and month agree.
    #[test]
    fn prop_period_matches_calendar_month(a in timestamp(), b in timestamp()) {
        let same = a.format("%Y-%m").to_string() == b.format("%Y-%m").to_string();
        prop_assert_eq!(PayrollPeriod::of(&a) == PayrollPeriod::of(&b), same);
    }

    /// Periods never go backwards as time advances.
    #[test]
    fn prop_period_is_monotonic(a in timestamp(), b in timestamp()) {
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(PayrollPeriod::of(&early) <= PayrollPeriod::of(&late));
    }
}
