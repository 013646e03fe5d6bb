//! chat_core - Core types and traits for the CundiBot client
//!
//! This crate provides the foundational types shared by the other crates:
//! - `config` - endpoint and proxy configuration
//! - `history` - replayed `(prompt, reply)` history
//! - `message` - visible transcript entries
//! - `protocol` - answering endpoint wire types
//! - `service` - the `AnswerService` seam
//! - `admin` - admin API payloads

pub mod admin;
pub mod config;
pub mod error;
pub mod history;
pub mod message;
pub mod mode;
pub mod protocol;
pub mod service;

// Re-export commonly used types
pub use config::{Config, ProxyAuth};
pub use error::AnswerError;
pub use history::{ChatHistory, HistoryEntry};
pub use message::{Sender, Transcript, TranscriptEntry};
pub use mode::ChatMode;
pub use protocol::{AnswerReply, AnswerRequest, ErrorBody, GradingRequest};
pub use service::AnswerService;
