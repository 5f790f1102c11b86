//! Base64 text encoding for values that cross the wire.
//!
//! Only public values implement [`WireEncoding`]. [`crate::Mask`] does not,
//! so a plaintext mask cannot be encoded by accident.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    error::CryptoError,
    group::{DataElement, MaskedElement},
    token::EncryptedMaskToken,
};

/// A value with a fixed binary wire form.
pub trait WireEncoding: Sized {
    /// Binary form.
    fn to_wire_bytes(&self) -> Vec<u8>;

    /// Parse the binary form.
    fn from_wire_bytes(bytes: &[u8]) -> Result<Self, CryptoError>;
}

impl WireEncoding for DataElement {
    fn to_wire_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn from_wire_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_bytes(bytes)
    }
}

impl WireEncoding for MaskedElement {
    fn to_wire_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn from_wire_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_bytes(bytes)
    }
}

impl WireEncoding for EncryptedMaskToken {
    fn to_wire_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_wire_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_bytes(bytes)
    }
}

/// Encode a value as standard, padded base64.
pub fn encode<T: WireEncoding>(value: &T) -> String {
    STANDARD.encode(value.to_wire_bytes())
}

/// Decode standard base64 text into a value.
///
/// # Errors
///
/// - `InvalidEncoding`: not valid base64
/// - any parse error of the target type
pub fn decode<T: WireEncoding>(text: &str) -> Result<T, CryptoError> {
    let bytes = decode_bytes(text)?;
    T::from_wire_bytes(&bytes)
}

/// Decode standard base64 text into raw bytes.
///
/// # Errors
///
/// - `InvalidEncoding`: not valid base64
pub fn decode_bytes(text: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD.decode(text).map_err(|e| CryptoError::InvalidEncoding { reason: e.to_string() })
}
