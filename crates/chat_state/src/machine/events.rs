//! Tutor events - what moves the quiz forward
//!
//! Only `Activated` and `Deactivated` come straight from the user. The
//! others are raised by the session once the matching reply has arrived.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TutorEvent {
    /// User switched tutor mode on.
    Activated,

    /// User switched tutor mode off.
    Deactivated,

    /// The intake prompt for `topic` was answered.
    TopicAccepted { topic: String },

    /// The current question's answer was answered with feedback.
    AnswerAccepted,

    /// The closing evaluation round is over (successfully or not).
    GradingFinished,
}

impl TutorEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Activated => "activated",
            Self::Deactivated => "deactivated",
            Self::TopicAccepted { .. } => "topic_accepted",
            Self::AnswerAccepted => "answer_accepted",
            Self::GradingFinished => "grading_finished",
        }
    }
}
