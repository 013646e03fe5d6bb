use thiserror::Error;

/// Failures of admin console calls.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The key was rejected (401). The console drops it and must reconnect.
    #[error("Clave de API incorrecta o no autorizada.")]
    Auth,

    #[error("La conexión se ha perdido o no se ha establecido.")]
    NotConnected,

    #[error("{0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminError {
    /// Whether the caller has to authenticate again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::Auth | Self::NotConnected)
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
