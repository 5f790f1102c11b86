//! Oblimask Cryptographic Primitives
//!
//! Building blocks for the oblivious-masking protocol. Pure functions with
//! deterministic outputs: callers provide the random bytes (mask seeds and
//! nonces), which keeps issuance reproducible under test.
//!
//! # Mask Lifecycle
//!
//! A mask is a random non-zero Ristretto255 scalar. The server never hands it
//! out in the clear. Instead it seals the mask under its long-term
//! [`MaskingKey`] and gives the caller the resulting [`EncryptedMaskToken`].
//! The caller later returns the token together with its data, and the server
//! opens the token and applies the mask.
//!
//! ```text
//! OS RNG → 64-byte seed
//!        │
//!        ▼ reduce mod ℓ
//! Mask (scalar)
//!        │
//!        ▼ XChaCha20-Poly1305 under MaskingKey
//! EncryptedMaskToken → base64 → client
//!        │
//!        ▼ (returned by client) open
//! Mask × DataElement → MaskedElement
//! ```
//!
//! # Security
//!
//! Confidentiality:
//! - [`Mask`] has no text encoding and a redacted `Debug`
//! - Mask and key bytes are zeroized on drop
//!
//! Authenticity:
//! - Any modification of a token (version, nonce, or ciphertext) fails the
//!   Poly1305 tag check
//! - Tokens sealed under a different key fail the same check, so a restart
//!   with a fresh key invalidates every outstanding token
//!
//! Obliviousness:
//! - Inputs are hashed into the group on the caller's side with
//!   [`DataElement::hash`]; the server only ever sees group elements

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod encoding;
pub mod error;
pub mod group;
pub mod token;

pub use encoding::{WireEncoding, decode, decode_bytes, encode};
pub use error::CryptoError;
pub use group::{DataElement, ELEMENT_SIZE, MASK_SEED_SIZE, Mask, MaskedElement, SCALAR_SIZE};
pub use token::{
    EncryptedMaskToken, KEY_SIZE, MaskingKey, NONCE_SIZE, TOKEN_SIZE, TOKEN_VERSION, open_mask,
    seal_mask,
};
