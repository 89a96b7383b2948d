// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Compute Lifecycle

use occi_engine::domain::ComputeAction;
use occi_engine::entity::ComputeState;
use occi_engine::state_machine::StateMachine;
use proptest::prelude::*;

fn state_strategy() -> impl Strategy<Value = ComputeState> {
    prop_oneof![
        Just(ComputeState::Active),
        Just(ComputeState::Inactive),
        Just(ComputeState::Suspended),
        Just(ComputeState::Error),
    ]
}

fn action_strategy() -> impl Strategy<Value = ComputeAction> {
    prop_oneof![
        Just(ComputeAction::Start),
        Just(ComputeAction::Stop),
        Just(ComputeAction::Restart),
        Just(ComputeAction::Suspend),
    ]
}

proptest! {
    /// Property: can_transition agrees with transition
    #[test]
    fn prop_can_transition_agrees(state in state_strategy(), action in action_strategy()) {
        prop_assert_eq!(state.can_transition(&action), state.transition(&action).is_ok());
    }

    /// Property: valid_inputs lists exactly the accepted actions
    #[test]
    fn prop_valid_inputs_accepted(state in state_strategy()) {
        let valid = state.valid_inputs();
        for action in ComputeAction::ALL {
            prop_assert_eq!(valid.contains(&action), state.transition(&action).is_ok());
        }
    }

    /// Property: replaying any action sequence never leaves the error state
    #[test]
    fn prop_error_is_terminal(actions in proptest::collection::vec(action_strategy(), 0..20)) {
        let mut state = ComputeState::Error;
        for action in &actions {
            if let Ok((next, _)) = state.transition(action) {
                state = next;
            }
        }
        prop_assert_eq!(state, ComputeState::Error);
    }

    /// Property: accepted transitions never enter the error state
    #[test]
    fn prop_actions_never_fault(
        start in state_strategy(),
        actions in proptest::collection::vec(action_strategy(), 0..20),
    ) {
        prop_assume!(start != ComputeState::Error);
        let mut state = start;
        for action in &actions {
            if let Ok((next, _)) = state.transition(action) {
                state = next;
            }
        }
        prop_assert_ne!(state, ComputeState::Error);
    }
}
