//! Mask tokens sealed with `XChaCha20-Poly1305`
//!
//! All functions are pure - nonces must be provided by the caller.
//! This enables deterministic testing of issuance.

use std::fmt;

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};
use zeroize::{Zeroize, Zeroizing};

use crate::{
    error::CryptoError,
    group::{Mask, SCALAR_SIZE},
};

/// Size of the masking key (32 bytes)
pub const KEY_SIZE: usize = 32;

/// Size of the `XChaCha20` nonce (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Current token layout version
pub const TOKEN_VERSION: u8 = 1;

/// Poly1305 tag size (16 bytes)
const POLY1305_TAG_SIZE: usize = 16;

/// Sealed mask size (scalar plus tag)
const SEALED_SIZE: usize = SCALAR_SIZE + POLY1305_TAG_SIZE;

/// Total token size: version, nonce, sealed mask
pub const TOKEN_SIZE: usize = 1 + NONCE_SIZE + SEALED_SIZE;

/// The server's long-term secret.
///
/// Zeroized on drop. Never serialized; `Debug` is redacted.
pub struct MaskingKey {
    key: [u8; KEY_SIZE],
}

impl MaskingKey {
    /// Wrap raw key bytes.
    ///
    /// Production keys come from the OS RNG at startup.
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for MaskingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MaskingKey(<redacted>)")
    }
}

impl Drop for MaskingKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// A mask sealed under a [`MaskingKey`].
///
/// Layout:
/// - byte 0: version (authenticated as associated data)
/// - bytes 1-24: nonce
/// - bytes 25-72: ciphertext including 16-byte Poly1305 tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedMaskToken {
    bytes: [u8; TOKEN_SIZE],
}

impl EncryptedMaskToken {
    /// Parse raw token bytes.
    ///
    /// Only the length is checked here; authenticity is checked by
    /// [`open_mask`].
    ///
    /// # Errors
    ///
    /// - `InvalidLength`: not [`TOKEN_SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; TOKEN_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidLength {
            what: "token",
            expected: TOKEN_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    /// Raw token bytes.
    pub fn as_bytes(&self) -> &[u8; TOKEN_SIZE] {
        &self.bytes
    }

    /// Layout version byte.
    pub fn version(&self) -> u8 {
        self.bytes[0]
    }

    fn nonce(&self) -> &[u8] {
        &self.bytes[1..=NONCE_SIZE]
    }

    fn sealed(&self) -> &[u8] {
        &self.bytes[1 + NONCE_SIZE..]
    }
}

/// Seal a mask under the masking key.
///
/// # Security
///
/// - Caller MUST provide a fresh random nonce per token
/// - The version byte is bound as associated data
///
/// # Errors
///
/// - `EncryptionFailed`: the cipher rejected the input
pub fn seal_mask(
    key: &MaskingKey,
    mask: &Mask,
    nonce: [u8; NONCE_SIZE],
) -> Result<EncryptedMaskToken, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.key().into());
    let plaintext = mask.to_bytes();

    let sealed = cipher
        .encrypt(XNonce::from_slice(&nonce), Payload {
            msg: plaintext.as_slice(),
            aad: &[TOKEN_VERSION],
        })
        .map_err(|_| CryptoError::EncryptionFailed)?;

    if sealed.len() != SEALED_SIZE {
        return Err(CryptoError::EncryptionFailed);
    }

    let mut bytes = [0u8; TOKEN_SIZE];
    bytes[0] = TOKEN_VERSION;
    bytes[1..=NONCE_SIZE].copy_from_slice(&nonce);
    bytes[1 + NONCE_SIZE..].copy_from_slice(&sealed);

    Ok(EncryptedMaskToken { bytes })
}

/// Open a token and recover its mask.
///
/// # Errors
///
/// - `DecryptionFailed`: unknown version, wrong key, or tampered token
pub fn open_mask(key: &MaskingKey, token: &EncryptedMaskToken) -> Result<Mask, CryptoError> {
    let version = token.version();
    if version != TOKEN_VERSION {
        return Err(CryptoError::DecryptionFailed {
            reason: format!("unsupported token version {version}"),
        });
    }

    let cipher = XChaCha20Poly1305::new(key.key().into());
    let plaintext = cipher
        .decrypt(
            XNonce::from_slice(token.nonce()),
            Payload { msg: token.sealed(), aad: &[version] },
        )
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::DecryptionFailed {
            reason: "authentication failed".to_string(),
        })?;

    Mask::from_bytes(plaintext.as_slice()).map_err(|_| CryptoError::DecryptionFailed {
        reason: "token does not hold a valid mask".to_string(),
    })
}
