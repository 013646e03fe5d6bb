//! State transitions - tutor FSM transition logic
//!
//! Every change to `TutorState` goes through `TutorMachine::handle_event`.

use thiserror::Error;

use super::events::TutorEvent;
use super::states::{TutorPhase, TutorState};

/// Error type for invalid state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} with event {event}")]
    InvalidTransition { from: TutorPhase, event: String },
}

/// Represents a state transition result.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: TutorState,
    /// The state after the transition.
    pub to: TutorState,
    /// The event that triggered the transition.
    pub event: TutorEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine driving the tutor quiz.
#[derive(Debug, Clone)]
pub struct TutorMachine {
    /// Current state.
    current_state: TutorState,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    /// Max history entries to keep.
    max_history: usize,
}

impl Default for TutorMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TutorMachine {
    /// Create a new machine with tutor mode off.
    pub fn new() -> Self {
        Self::with_state(TutorState::idle())
    }

    /// Create a machine with a specific initial state.
    pub fn with_state(state: TutorState) -> Self {
        Self {
            current_state: state,
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> &TutorState {
        &self.current_state
    }

    pub fn phase(&self) -> TutorPhase {
        self.current_state.phase
    }

    /// Get the transition history.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Handle an event and transition to a new state.
    ///
    /// Rejected events leave the machine untouched.
    pub fn handle_event(&mut self, event: TutorEvent) -> Result<StateTransition, TransitionError> {
        let new_state = self.preview(&event)?;
        let old_state = std::mem::replace(&mut self.current_state, new_state.clone());
        let changed = old_state != new_state;

        tracing::debug!(
            event = event.name(),
            from = old_state.phase.as_str(),
            to = new_state.phase.as_str(),
            current_index = new_state.current_index,
            "tutor transition"
        );

        let transition = StateTransition {
            from: old_state,
            to: new_state,
            event,
            changed,
        };

        // Add to history
        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        Ok(transition)
    }

    /// Compute the state `event` would lead to without applying it.
    pub fn preview(&self, event: &TutorEvent) -> Result<TutorState, TransitionError> {
        Self::compute_next_state(&self.current_state, event).ok_or_else(|| {
            TransitionError::InvalidTransition {
                from: self.current_state.phase,
                event: event.name().to_string(),
            }
        })
    }

    /// Compute the next state given current state and event.
    fn compute_next_state(state: &TutorState, event: &TutorEvent) -> Option<TutorState> {
        use TutorEvent::*;
        use TutorPhase::*;

        let answered = |phase: TutorPhase| TutorState {
            phase,
            topic: state.topic.clone(),
            current_index: state.current_index + 1,
        };

        match (state.phase, event) {
            // ========== Mode Toggle ==========
            (Idle, Activated) => Some(TutorState::initial()),
            (_, Deactivated) => Some(TutorState::idle()),

            // ========== Topic Intake ==========
            (WaitingTopic, TopicAccepted { topic }) => Some(TutorState {
                phase: WaitingAnswer1,
                topic: topic.clone(),
                current_index: 0,
            }),

            // ========== Question Rounds ==========
            (WaitingAnswer1, AnswerAccepted) => Some(answered(WaitingAnswer2)),
            (WaitingAnswer2, AnswerAccepted) => Some(answered(WaitingAnswer3)),
            (WaitingAnswer3, AnswerAccepted) => Some(answered(Grading)),

            // ========== Grading ==========
            (Grading, GradingFinished) => Some(TutorState::initial()),

            _ => None,
        }
    }

    /// Check if a transition is valid without executing it.
    pub fn can_transition(&self, event: &TutorEvent) -> bool {
        self.preview(event).is_ok()
    }

    /// Reset to tutor-off.
    pub fn reset(&mut self) {
        self.current_state = TutorState::idle();
    }
}
