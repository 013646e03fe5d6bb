//! State machine module
//!
//! Contains the FSM that sequences a tutor quiz.

mod events;
mod states;
mod transitions;

pub use events::TutorEvent;
pub use states::{TutorPhase, TutorState, QUESTIONS_PER_QUIZ};
pub use transitions::{StateTransition, TransitionError, TutorMachine};
