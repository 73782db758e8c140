//! Monthly payment calculation and payout limits.

use paysettle_shared::PayrollConfig;
use rust_decimal::Decimal;

use crate::contract::Contract;

/// Pure payroll arithmetic over a contract's compensation.
pub struct PayrollCalculator;

impl PayrollCalculator {
    /// Returns the amount owed per period: `salary + variable_pay`.
    ///
    /// No rounding is applied. Always recomputed from the record passed in,
    /// so a compensation change is picked up by the next check.
    #[must_use]
    pub fn monthly_payment(contract: &Contract) -> Decimal {
        contract.salary.saturating_add(contract.variable_pay)
    }
}

/// Caps applied to advances and payments, as multiples of the monthly payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollPolicy {
    /// Multiplier for the advance cap.
    pub advance_limit_multiplier: Decimal,
    /// Multiplier for the payment cap.
    pub payment_limit_multiplier: Decimal,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            advance_limit_multiplier: Decimal::TWO,
            payment_limit_multiplier: Decimal::TWO,
        }
    }
}

impl PayrollPolicy {
    /// Builds the policy from loaded configuration.
    #[must_use]
    pub fn from_config(config: &PayrollConfig) -> Self {
        Self {
            advance_limit_multiplier: config.advance_limit_multiplier,
            payment_limit_multiplier: config.payment_limit_multiplier,
        }
    }

    /// Largest advance that may be requested under `contract`.
    #[must_use]
    pub fn advance_limit(&self, contract: &Contract) -> Decimal {
        PayrollCalculator::monthly_payment(contract).saturating_mul(self.advance_limit_multiplier)
    }

    /// Largest single payment that may be made under `contract`.
    #[must_use]
    pub fn payment_limit(&self, contract: &Contract) -> Decimal {
        PayrollCalculator::monthly_payment(contract).saturating_mul(self.payment_limit_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::contract;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_payment() {
        let c = contract("C1", dec!(1000), dec!(200));
        assert_eq!(PayrollCalculator::monthly_payment(&c), dec!(1200));
    }

    #[test]
    fn test_monthly_payment_keeps_precision() {
        let c = contract("C1", dec!(1000.005), dec!(0.0001));
        assert_eq!(PayrollCalculator::monthly_payment(&c), dec!(1000.0051));
    }

    #[test]
    fn test_default_policy_caps_at_twice_monthly() {
        let c = contract("C1", dec!(1000), dec!(200));
        let policy = PayrollPolicy::default();
        assert_eq!(policy.advance_limit(&c), dec!(2400));
        assert_eq!(policy.payment_limit(&c), dec!(2400));
    }

    #[test]
    fn test_policy_from_config() {
        let config = PayrollConfig {
            advance_limit_multiplier: dec!(1.5),
            payment_limit_multiplier: dec!(3),
        };
        let policy = PayrollPolicy::from_config(&config);
        let c = contract("C1", dec!(1000), dec!(0));
        assert_eq!(policy.advance_limit(&c), dec!(1500));
        assert_eq!(policy.payment_limit(&c), dec!(3000));
    }
}
