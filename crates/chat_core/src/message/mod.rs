//! Message module - visible transcript types
//!
//! The transcript is what the user sees. It is separate from the replayed
//! history: mode banners and error notices show up here but are never sent
//! to the answering service.

mod transcript;

pub use transcript::{Sender, Transcript, TranscriptEntry};
