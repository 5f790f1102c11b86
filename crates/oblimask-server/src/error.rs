//! Server error types.

use std::fmt;

use oblimask_core::MaskingError;

/// Errors that can occur while starting or running the server.
#[derive(Debug)]
pub enum ServerError {
    /// Configuration error (zero limits, zero workers, etc.).
    ///
    /// Fatal; prevents server startup. Fix configuration and restart.
    Config(String),

    /// Transport/network error (bind failure, I/O error, etc.).
    ///
    /// Usually fatal at startup (bind address in use). Check error message
    /// for details.
    Transport(String),

    /// Protocol setup failed (no entropy for the masking key).
    Protocol(MaskingError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Protocol(err) => write!(f, "protocol error: {err}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MaskingError> for ServerError {
    fn from(err: MaskingError) -> Self {
        Self::Protocol(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
