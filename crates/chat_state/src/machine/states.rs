//! Tutor states - where the quiz currently stands
//!
//! The phase only selects which prompt template the next user input is
//! wrapped in. The conversational context itself lives in the replayed
//! history.

use serde::{Deserialize, Serialize};

/// Number of question/answer rounds in one quiz.
pub const QUESTIONS_PER_QUIZ: u8 = 3;

/// Position of the tutor dialogue.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TutorPhase {
    /// Tutor mode is off.
    #[default]
    Idle,

    /// Waiting for the student to name a topic.
    WaitingTopic,

    #[serde(rename = "waiting_answer_1")]
    WaitingAnswer1,

    #[serde(rename = "waiting_answer_2")]
    WaitingAnswer2,

    #[serde(rename = "waiting_answer_3")]
    WaitingAnswer3,

    /// Third answer committed; the closing evaluation is owed before the
    /// machine returns to `WaitingTopic`.
    Grading,
}

impl TutorPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether the next user input has a template to go into.
    pub fn accepts_user_input(&self) -> bool {
        matches!(
            self,
            Self::WaitingTopic | Self::WaitingAnswer1 | Self::WaitingAnswer2 | Self::WaitingAnswer3
        )
    }

    /// 1-based number of the question being answered, if any.
    pub fn question_number(&self) -> Option<u8> {
        match self {
            Self::WaitingAnswer1 => Some(1),
            Self::WaitingAnswer2 => Some(2),
            Self::WaitingAnswer3 => Some(3),
            Self::Idle | Self::WaitingTopic | Self::Grading => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::WaitingTopic => "waiting_topic",
            Self::WaitingAnswer1 => "waiting_answer_1",
            Self::WaitingAnswer2 => "waiting_answer_2",
            Self::WaitingAnswer3 => "waiting_answer_3",
            Self::Grading => "grading",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Idle => "Tutor mode off",
            Self::WaitingTopic => "Waiting for a topic",
            Self::WaitingAnswer1 | Self::WaitingAnswer2 | Self::WaitingAnswer3 => {
                "Waiting for an answer"
            }
            Self::Grading => "Grading the quiz",
        }
    }
}

/// Quiz progress carried between turns.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct TutorState {
    pub phase: TutorPhase,
    pub topic: String,
    /// Completed question/answer rounds, `0..=QUESTIONS_PER_QUIZ`.
    pub current_index: u8,
}

impl TutorState {
    /// Tutor mode off.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Fresh quiz: `{waiting_topic, "", 0}`.
    pub fn initial() -> Self {
        Self {
            phase: TutorPhase::WaitingTopic,
            topic: String::new(),
            current_index: 0,
        }
    }
}
