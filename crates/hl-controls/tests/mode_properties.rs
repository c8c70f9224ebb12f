use hl_controls::{OperationMode, PmvByClothing, next_mode};
use proptest::prelude::*;

fn any_mode() -> impl Strategy<Value = OperationMode> {
    prop_oneof![
        Just(OperationMode::Heating),
        Just(OperationMode::Cooling),
        Just(OperationMode::StopOpen),
        Just(OperationMode::StopClosed),
    ]
}

fn any_votes() -> impl Strategy<Value = PmvByClothing> {
    (-3.0f64..3.0, -3.0f64..3.0, -3.0f64..3.0).prop_map(|(heavy, middle, light)| {
        PmvByClothing {
            heavy,
            middle,
            light,
        }
    })
}

proptest! {
    #[test]
    fn decision_is_deterministic(mode in any_mode(), demand in any::<bool>(), votes in any_votes()) {
        let a = next_mode(mode, demand, votes).unwrap();
        let b = next_mode(mode, demand, votes).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn heating_never_chosen_when_everyone_is_warm(mode in any_mode(), votes in any_votes()) {
        // heavy clothing is always the warmest vote
        let warm = PmvByClothing {
            heavy: votes.heavy.abs() + 0.8,
            middle: votes.middle.abs() + 0.75,
            light: votes.light.abs() + 0.71,
        };
        let next = next_mode(mode, true, warm).unwrap();
        prop_assert_ne!(next, OperationMode::Heating);
    }

    #[test]
    fn demand_off_always_stops(mode in any_mode(), votes in any_votes()) {
        prop_assert_eq!(next_mode(mode, false, votes).unwrap(), OperationMode::StopClosed);
    }
}
