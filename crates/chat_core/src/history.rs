//! Replayed chat history.
//!
//! The answering service keeps no memory between calls, so every request
//! carries the full list of `(prompt, reply)` pairs exchanged so far.

use serde::{Deserialize, Serialize};

/// One completed round trip. Serialized as a two element JSON array.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry(pub String, pub String);

impl HistoryEntry {
    pub fn new(prompt: impl Into<String>, reply: impl Into<String>) -> Self {
        Self(prompt.into(), reply.into())
    }

    pub fn prompt(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ChatHistory {
    entries: Vec<HistoryEntry>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
