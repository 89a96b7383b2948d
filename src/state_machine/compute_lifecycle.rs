// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compute Lifecycle State Machine
//!
//! Maps compute actions onto `occi.compute.state`.
//!
//! # Transitions
//!
//! - start: Inactive | Suspended → Active
//! - stop: Active | Suspended → Inactive
//! - restart: Active → Active
//! - suspend: Active → Suspended
//!
//! Error is terminal for actions; the backend has to clear it.

use super::{StateMachine, TransitionError, TransitionResult};
use crate::domain::ComputeAction;
use crate::entity::ComputeState;

/// Transition output with metadata
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionOutput {
    /// Warnings generated during transition
    pub warnings: Vec<String>,
}

impl TransitionOutput {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn with_warning(warning: impl Into<String>) -> Self {
        Self {
            warnings: vec![warning.into()],
        }
    }
}

impl StateMachine for ComputeState {
    type Input = ComputeAction;
    type Output = TransitionOutput;

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use ComputeAction::*;
        use ComputeState::*;

        match (self, input) {
            (Error, _) => Err(TransitionError::Faulted {
                state: Error.to_string(),
                reason: format!("{input} rejected until the error is cleared"),
            }),

            (Inactive, Start) | (Suspended, Start) => Ok((Active, TransitionOutput::ok())),

            (Active, Stop) => Ok((Inactive, TransitionOutput::ok())),
            (Suspended, Stop) => Ok((
                Inactive,
                TransitionOutput::with_warning("stopping a suspended compute discards its saved state"),
            )),

            (Active, Restart) => Ok((Active, TransitionOutput::ok())),
            (Active, Suspend) => Ok((Suspended, TransitionOutput::ok())),

            (state, action) => Err(TransitionError::NotAllowed {
                state: state.to_string(),
                input: action.to_string(),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        ComputeAction::ALL
            .into_iter()
            .filter(|action| self.can_transition(action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ComputeState::Inactive, ComputeAction::Start, ComputeState::Active ; "start inactive")]
    #[test_case(ComputeState::Suspended, ComputeAction::Start, ComputeState::Active ; "resume suspended")]
    #[test_case(ComputeState::Active, ComputeAction::Stop, ComputeState::Inactive ; "stop active")]
    #[test_case(ComputeState::Suspended, ComputeAction::Stop, ComputeState::Inactive ; "stop suspended")]
    #[test_case(ComputeState::Active, ComputeAction::Restart, ComputeState::Active ; "restart")]
    #[test_case(ComputeState::Active, ComputeAction::Suspend, ComputeState::Suspended ; "suspend")]
    fn test_allowed(from: ComputeState, action: ComputeAction, to: ComputeState) {
        let (next, _) = from.transition(&action).unwrap();
        assert_eq!(next, to);
    }

    #[test_case(ComputeState::Active, ComputeAction::Start ; "start active")]
    #[test_case(ComputeState::Inactive, ComputeAction::Stop ; "stop inactive")]
    #[test_case(ComputeState::Inactive, ComputeAction::Restart ; "restart inactive")]
    #[test_case(ComputeState::Suspended, ComputeAction::Suspend ; "suspend suspended")]
    fn test_rejected(from: ComputeState, action: ComputeAction) {
        assert!(matches!(
            from.transition(&action),
            Err(TransitionError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_error_rejects_everything() {
        assert!(ComputeState::Error.valid_inputs().is_empty());
        assert!(matches!(
            ComputeState::Error.transition(&ComputeAction::Start),
            Err(TransitionError::Faulted { .. })
        ));
    }

    #[test]
    fn test_stop_from_suspended_warns() {
        let (_, output) = ComputeState::Suspended.transition(&ComputeAction::Stop).unwrap();
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_valid_inputs() {
        assert_eq!(
            ComputeState::Active.valid_inputs(),
            vec![ComputeAction::Stop, ComputeAction::Restart, ComputeAction::Suspend]
        );
        assert_eq!(ComputeState::Inactive.valid_inputs(), vec![ComputeAction::Start]);
    }
}
