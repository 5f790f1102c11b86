//! Ristretto255 group operations
//!
//! Wraps `curve25519-dalek` behind the three values the protocol works
//! with: secret [`Mask`] scalars, client-side [`DataElement`]s, and the
//! resulting [`MaskedElement`]s.

use std::fmt;

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;

/// Size of a compressed group element (32 bytes)
pub const ELEMENT_SIZE: usize = 32;

/// Size of a canonical scalar encoding (32 bytes)
pub const SCALAR_SIZE: usize = 32;

/// Size of the uniform seed a mask is reduced from (64 bytes)
pub const MASK_SEED_SIZE: usize = 64;

/// A secret, non-zero scalar.
///
/// Masks exist in the clear only while a token is being sealed or applied.
/// There is deliberately no text encoding for this type.
#[derive(Clone, PartialEq, Eq)]
pub struct Mask(Scalar);

impl Mask {
    /// Derive a mask from 64 uniformly random bytes.
    ///
    /// The seed is reduced modulo the group order, so the result is uniform.
    ///
    /// # Errors
    ///
    /// - `ZeroMask`: the seed reduced to zero (probability 2^-252)
    pub fn from_seed(seed: &[u8; MASK_SEED_SIZE]) -> Result<Self, CryptoError> {
        let scalar = Scalar::from_bytes_mod_order_wide(seed);
        if scalar == Scalar::ZERO {
            return Err(CryptoError::ZeroMask);
        }
        Ok(Self(scalar))
    }

    /// Parse a canonical 32-byte scalar encoding.
    ///
    /// # Errors
    ///
    /// - `InvalidLength`: not 32 bytes
    /// - `InvalidScalar`: not canonical, or zero
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SCALAR_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidLength { what: "mask", expected: SCALAR_SIZE, actual: bytes.len() }
        })?;

        let scalar: Option<Scalar> = Scalar::from_canonical_bytes(array).into();
        match scalar {
            Some(scalar) if scalar != Scalar::ZERO => Ok(Self(scalar)),
            _ => Err(CryptoError::InvalidScalar),
        }
    }

    /// Canonical scalar bytes, wiped when the returned buffer is dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_SIZE]> {
        Zeroizing::new(self.0.to_bytes())
    }

    /// Apply this mask to a data element.
    ///
    /// Pure: the same mask and element always give the same result.
    pub fn apply(&self, element: &DataElement) -> MaskedElement {
        MaskedElement(element.0 * self.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mask(<redacted>)")
    }
}

impl Drop for Mask {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// An input mapped into the group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataElement(RistrettoPoint);

impl DataElement {
    /// Hash arbitrary bytes into the group.
    ///
    /// SHA-512 of the input is mapped to a point with the Ristretto
    /// `from_uniform_bytes` construction.
    pub fn hash(input: &[u8]) -> Self {
        Self(RistrettoPoint::hash_from_bytes::<Sha512>(input))
    }

    /// Parse a compressed element.
    ///
    /// # Errors
    ///
    /// - `InvalidLength`: not 32 bytes
    /// - `InvalidElement`: not a canonical Ristretto encoding
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        decompress(bytes, "element").map(Self)
    }

    /// Compressed 32-byte encoding.
    pub fn to_bytes(&self) -> [u8; ELEMENT_SIZE] {
        self.0.compress().to_bytes()
    }
}

/// The result of applying a [`Mask`] to a [`DataElement`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskedElement(RistrettoPoint);

impl MaskedElement {
    /// Parse a compressed masked element.
    ///
    /// # Errors
    ///
    /// - `InvalidLength`: not 32 bytes
    /// - `InvalidElement`: not a canonical Ristretto encoding
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        decompress(bytes, "masked element").map(Self)
    }

    /// Compressed 32-byte encoding.
    pub fn to_bytes(&self) -> [u8; ELEMENT_SIZE] {
        self.0.compress().to_bytes()
    }
}

fn decompress(bytes: &[u8], what: &'static str) -> Result<RistrettoPoint, CryptoError> {
    let array: [u8; ELEMENT_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidLength {
        what,
        expected: ELEMENT_SIZE,
        actual: bytes.len(),
    })?;

    CompressedRistretto(array).decompress().ok_or(CryptoError::InvalidElement)
}
