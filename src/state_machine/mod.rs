// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic state machine types for entity lifecycles. Transitions are pure
//! functions: they compute the next state and an output without touching
//! the entity they describe.
//!
//! This is a Mealy machine shape, the output depends on both the current
//! state and the input:
//!
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! # Example
//!
//! ```rust
//! use occi_engine::entity::ComputeState;
//! use occi_engine::domain::ComputeAction;
//! use occi_engine::state_machine::StateMachine;
//!
//! let (next, _) = ComputeState::Inactive.transition(&ComputeAction::Start).unwrap();
//! assert_eq!(next, ComputeState::Active);
//! assert!(!ComputeState::Error.can_transition(&ComputeAction::Start));
//! ```

pub mod compute_lifecycle;

pub use compute_lifecycle::TransitionOutput;

use crate::errors::OcciError;

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Input is not accepted in the current state
    #[error("{input} is not allowed from {state}")]
    NotAllowed { state: String, input: String },

    /// Current state rejects every input
    #[error("{state} accepts no transitions: {reason}")]
    Faulted { state: String, reason: String },
}

impl From<TransitionError> for OcciError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotAllowed { state, input } => OcciError::InvalidTransition {
                state,
                action: input,
            },
            TransitionError::Faulted { state, reason } => OcciError::InvalidTransition {
                state,
                action: reason,
            },
        }
    }
}

/// Trait for finite state machines
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    ///
    /// # Returns
    /// - Ok((new_state, output)) if transition is valid
    /// - Err(TransitionError) if transition is invalid
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Valid inputs from the current state, when inputs are enumerable
    fn valid_inputs(&self) -> Vec<Self::Input>
    where
        Self::Input: Clone,
    {
        Vec::new()
    }
}
