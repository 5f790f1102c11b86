//! Error types for masking primitives

use thiserror::Error;

/// Errors from group, token, and encoding operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Text was not valid standard base64
    #[error("invalid encoding: {reason}")]
    InvalidEncoding {
        /// Decoder message
        reason: String,
    },

    /// Decoded bytes had the wrong size for the target type
    #[error("invalid {what} length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Name of the value being decoded
        what: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Bytes are not the canonical encoding of a Ristretto255 point
    #[error("invalid group element encoding")]
    InvalidElement,

    /// Bytes are not the canonical encoding of a non-zero scalar
    #[error("invalid scalar encoding")]
    InvalidScalar,

    /// The seed reduced to the zero scalar, which cannot serve as a mask
    #[error("mask seed reduced to zero")]
    ZeroMask,

    /// Sealing a mask failed
    #[error("encryption failed")]
    EncryptionFailed,

    /// Token failed authentication or carried an unknown version
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Reason for decryption failure
        reason: String,
    },
}

impl CryptoError {
    /// Returns true if the error stems from caller-supplied bytes that could
    /// not be parsed (as opposed to failed authentication or a primitive
    /// failure).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::InvalidEncoding { .. } | Self::InvalidLength { .. } | Self::InvalidElement
        )
    }

    /// Returns true if the error is an authentication failure.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailed { .. })
    }
}
