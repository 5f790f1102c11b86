//! Environment abstraction for deterministic testing.
//!
//! Decouples the protocol from the system randomness source. Production uses
//! the OS RNG; tests use seeded or fixed sources so token issuance is
//! reproducible.

use thiserror::Error;

/// The randomness source failed to produce bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("entropy source failed: {reason}")]
pub struct EntropyError {
    /// Reason reported by the source
    pub reason: String,
}

/// Abstract environment providing randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - Failure is reported, never papered over with weak bytes
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Given the same RNG seed, this produces the same sequence of bytes
    /// - Uses cryptographically secure RNG
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError>;

    /// Generates a random fixed-size array.
    ///
    /// Convenience for nonces and key material.
    fn random_array<const N: usize>(&self) -> Result<[u8; N], EntropyError> {
        let mut bytes = [0u8; N];
        self.random_bytes(&mut bytes)?;
        Ok(bytes)
    }
}
