//! Error types for the masking protocol.
//!
//! Every failure of an obtain-mask or apply-mask call is exactly one of three
//! kinds. The kind, not the message, is what crosses the service boundary as
//! a machine-readable code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::EntropyError;

/// Errors that can occur during a protocol call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskingError {
    /// Request had the wrong shape or an undecodable value.
    ///
    /// Bad base64, wrong byte lengths, non-canonical group elements,
    /// mismatched `mask`/`data` lengths, batch size out of range.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// What was wrong, safe to echo to the caller
        reason: String,
    },

    /// A token failed authentication.
    ///
    /// Covers forged, corrupted, and stale-key tokens. The whole call is
    /// rejected.
    #[error("invalid mask token at index {index}")]
    InvalidToken {
        /// Position of the offending token in the request
        index: usize,
    },

    /// The randomness source or cipher failed.
    ///
    /// Fatal for the call. The reason is for server logs only.
    #[error("cryptographic failure: {reason}")]
    CryptoFailure {
        /// Internal detail, never sent to the caller
        reason: String,
    },
}

/// Machine-readable error code carried in failure responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`MaskingError::MalformedInput`]
    MalformedInput,
    /// See [`MaskingError::InvalidToken`]
    InvalidToken,
    /// See [`MaskingError::CryptoFailure`]
    CryptoFailure,
}

impl MaskingError {
    /// Shorthand for a `MalformedInput` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput { reason: reason.into() }
    }

    /// The wire error code for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::InvalidToken { .. } => ErrorKind::InvalidToken,
            Self::CryptoFailure { .. } => ErrorKind::CryptoFailure,
        }
    }

    /// Returns true if the caller caused this error.
    ///
    /// Caller errors are answered and forgotten. Server errors indicate a
    /// broken randomness source or cipher and deserve an operator's
    /// attention.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::MalformedInput { .. } | Self::InvalidToken { .. })
    }

    /// Message that is safe to return to the caller.
    ///
    /// Never includes key material, plaintext masks, or internal detail.
    pub fn public_message(&self) -> String {
        match self {
            Self::MalformedInput { .. } | Self::InvalidToken { .. } => self.to_string(),
            Self::CryptoFailure { .. } => "internal cryptographic failure".to_string(),
        }
    }
}

impl From<EntropyError> for MaskingError {
    fn from(err: EntropyError) -> Self {
        Self::CryptoFailure { reason: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(MaskingError::malformed("x").kind(), ErrorKind::MalformedInput);
        assert_eq!(MaskingError::InvalidToken { index: 0 }.kind(), ErrorKind::InvalidToken);
        assert_eq!(
            MaskingError::CryptoFailure { reason: "rng".to_string() }.kind(),
            ErrorKind::CryptoFailure
        );
    }

    #[test]
    fn caller_errors() {
        assert!(MaskingError::malformed("x").is_caller_error());
        assert!(MaskingError::InvalidToken { index: 3 }.is_caller_error());
        assert!(!MaskingError::CryptoFailure { reason: "rng".to_string() }.is_caller_error());
    }

    #[test]
    fn crypto_failure_message_hides_detail() {
        let err = MaskingError::CryptoFailure { reason: "getrandom: EAGAIN".to_string() };

        assert_snapshot!(err.public_message(), @"internal cryptographic failure");
        assert!(err.to_string().contains("EAGAIN"));
    }

    #[test]
    fn error_display() {
        assert_snapshot!(
            MaskingError::malformed("mask and data lists differ in length (2 vs 1)").to_string(),
            @"malformed input: mask and data lists differ in length (2 vs 1)"
        );
        assert_snapshot!(
            MaskingError::InvalidToken { index: 4 }.to_string(),
            @"invalid mask token at index 4"
        );
    }

    #[test]
    fn entropy_failure_is_crypto_failure() {
        let err: MaskingError = EntropyError { reason: "closed".to_string() }.into();
        assert_eq!(err.kind(), ErrorKind::CryptoFailure);
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_snapshot!(
            serde_json::to_string(&ErrorKind::MalformedInput).unwrap(),
            @r#""malformed_input""#
        );
    }
}
