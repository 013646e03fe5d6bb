//! Admin API payloads and their display rules.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::mode::ChatMode;

/// Filename used when the CSV export carries no usable `Content-Disposition`.
pub const DEFAULT_CSV_FILENAME: &str = "reporte_conversaciones.csv";

/// Logged questions that begin with this tag are templated prompts rather
/// than something the user typed.
pub const DYNAMIC_PROMPT_TAG: &str = "(MODO:";
pub const DYNAMIC_PROMPT_LABEL: &str = "N/A (Prompt Dinámico)";

const ANSWER_PREVIEW_CHARS: usize = 100;
const CONVERSATION_ID_PREFIX_CHARS: usize = 8;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UsageStats {
    pub total_conversations: u64,
    pub total_tokens: u64,
    /// Pre-formatted by the server with six decimals.
    pub total_cost: String,
    pub normal_mode_count: u64,
    pub tutor_mode_count: u64,
}

impl UsageStats {
    pub fn mode_count(&self, mode: ChatMode) -> u64 {
        match mode {
            ChatMode::Normal => self.normal_mode_count,
            ChatMode::Tutor => self.tutor_mode_count,
        }
    }
}

/// Optional date window for the stats endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl StatsRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Query parameters in the ISO form the server parses. The server compares
    /// `timestamp <= end_date`, so the end day is sent as its last microsecond.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end_date", format!("{}T23:59:59.999999", end.format("%Y-%m-%d"))));
        }
        pairs
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConversationLog {
    #[serde(default)]
    pub id: Option<i64>,
    pub conversation_id: String,
    pub timestamp: NaiveDateTime,
    pub mode: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub prompt_tokens: Option<i64>,
    #[serde(default)]
    pub completion_tokens: Option<i64>,
    #[serde(default)]
    pub total_tokens: Option<i64>,
    #[serde(default)]
    pub prompt_cost: Option<f64>,
    #[serde(default)]
    pub completion_cost: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

impl ConversationLog {
    pub fn short_conversation_id(&self) -> String {
        let prefix: String = self
            .conversation_id
            .chars()
            .take(CONVERSATION_ID_PREFIX_CHARS)
            .collect();
        format!("{prefix}...")
    }

    pub fn display_question(&self) -> &str {
        if self.question.starts_with(DYNAMIC_PROMPT_TAG) {
            DYNAMIC_PROMPT_LABEL
        } else {
            &self.question
        }
    }

    pub fn answer_preview(&self) -> String {
        let preview: String = self.answer.chars().take(ANSWER_PREVIEW_CHARS).collect();
        format!("{preview}...")
    }
}

/// `{ "message": ... }` acknowledgement returned by mutating admin calls.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

/// Downloaded CSV report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Extracts `filename="..."` from an attachment `Content-Disposition`.
pub fn filename_from_disposition(disposition: Option<&str>) -> String {
    disposition
        .filter(|value| value.contains("attachment"))
        .and_then(|value| {
            let start = value.find("filename=\"")? + "filename=\"".len();
            let rest = &value[start..];
            let end = rest.find('"')?;
            let name = &rest[..end];
            (!name.is_empty()).then(|| name.to_string())
        })
        .unwrap_or_else(|| DEFAULT_CSV_FILENAME.to_string())
}
