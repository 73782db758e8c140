//! Property-based tests for the settlement state machine.

use proptest::prelude::*;

use super::types::{SettlementChannel, SettlementStatus};

/// Strategy for generating random statuses.
fn arb_status() -> impl Strategy<Value = SettlementStatus> {
    prop_oneof![
        Just(SettlementStatus::Pending),
        Just(SettlementStatus::Approved),
        Just(SettlementStatus::Completed),
    ]
}

fn rank(status: SettlementStatus) -> u8 {
    match status {
        SettlementStatus::Pending => 0,
        SettlementStatus::Approved => 1,
        SettlementStatus::Completed => 2,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Transitions only ever move one step forward.
    #[test]
    fn prop_transitions_are_single_forward_steps(from in arb_status(), to in arb_status()) {
        let result = from.transition(to);
        prop_assert_eq!(result.is_ok(), rank(to) == rank(from) + 1);
    }

    /// Any walk of transitions reaches Completed at most once and never leaves it.
    #[test]
    fn prop_completed_is_terminal(steps in prop::collection::vec(arb_status(), 0..10)) {
        let mut status = SettlementStatus::Completed;
        for next in steps {
            if let Ok(moved) = status.transition(next) {
                status = moved;
            }
        }
        prop_assert_eq!(status, SettlementStatus::Completed);
    }

    /// Channel names round-trip through their display form in any case.
    #[test]
    fn prop_channel_parse_ignores_case(upper in any::<bool>(), cross in any::<bool>()) {
        let channel = if cross { SettlementChannel::CrossBorder } else { SettlementChannel::Local };
        let name = if upper {
            channel.as_str().to_uppercase()
        } else {
            channel.as_str().to_lowercase()
        };
        prop_assert_eq!(name.parse::<SettlementChannel>().unwrap(), channel);
    }
}
