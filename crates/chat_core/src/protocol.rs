//! Wire types for the answering endpoint.

use serde::{Deserialize, Serialize};

use crate::history::ChatHistory;
use crate::mode::ChatMode;

/// Body of a regular chat turn.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnswerRequest {
    /// Fully templated prompt handed to the model.
    pub full_prompt: String,
    /// What the user actually typed; this is what the server logs.
    pub raw_question: String,
    pub chat_history: ChatHistory,
    pub mode: ChatMode,
    pub conversation_id: String,
}

/// Body of the out-of-band grading call that closes a tutor quiz.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GradingRequest {
    pub question: String,
    pub chat_history: ChatHistory,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnswerReply {
    pub answer: String,
}

/// Error payload returned by the API on non-success statuses.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `detail` is usually a string but validation failures send a list of
    /// objects; anything non-string is rendered as JSON.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
