use thiserror::Error;

/// Generic message used when the server fails without a `detail`.
pub const GENERIC_SERVER_ERROR: &str = "Error en la respuesta del servidor.";

/// Every way an answering call can fail. None of them are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl AnswerError {
    /// Human readable part shown to the user in the transcript.
    pub fn detail(&self) -> &str {
        match self {
            Self::Transport(msg) | Self::Protocol(msg) => msg,
            Self::Server { detail, .. } => detail,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, AnswerError>;
