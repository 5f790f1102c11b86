//! Client error types.

use oblimask_core::ErrorKind;
use oblimask_crypto::CryptoError;
use thiserror::Error;

/// Errors returned by [`crate::MaskingClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, timeout, or body transfer failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure body.
    #[error("server rejected request ({kind:?}): {message}")]
    Rejected {
        /// Error code from the response
        kind: ErrorKind,
        /// Message from the response
        message: String,
    },

    /// Non-success status without a recognizable failure body.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// A success response had the wrong shape or length.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A returned element did not decode.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl ClientError {
    /// Returns true if retrying with fresh tokens may succeed.
    ///
    /// Tokens become invalid when the server restarts with a new key.
    pub fn is_stale_token(&self) -> bool {
        matches!(self, Self::Rejected { kind: ErrorKind::InvalidToken, .. })
    }
}
