//! chat_state - Chat session state and the tutor quiz FSM
//!
//! This crate owns everything a conversation carries between turns: the
//! conversation id, the mode, the replayed history, the visible transcript
//! and the tutor state machine. `ChatController` drives a session against
//! any `AnswerService`.

pub mod controller;
pub mod machine;
pub mod prompts;
pub mod session;

// Re-export commonly used types
pub use controller::{ChatController, GradingOutcome, TurnOutcome};
pub use machine::{
    StateTransition, TransitionError, TutorEvent, TutorMachine, TutorPhase, TutorState,
    QUESTIONS_PER_QUIZ,
};
pub use session::{ChatSession, SessionError, TurnPlan};
