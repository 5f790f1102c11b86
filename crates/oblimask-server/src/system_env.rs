//! Production Environment implementation using the OS RNG.
//!
//! `SystemEnv` draws every mask seed, nonce and the masking key from
//! getrandom. Output is not reproducible; tests that need reproducible
//! issuance supply their own [`Environment`].

use oblimask_core::{EntropyError, Environment};

/// Production environment backed by the OS cryptographic RNG.
///
/// # Security
///
/// getrandom provides OS-level randomness (e.g. `getrandom(2)` on Linux,
/// `BCryptGenRandom` on Windows). A failure is reported as an
/// [`EntropyError`], which the protocol turns into a `crypto_failure`
/// response for that call only.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(buffer).map_err(|e| EntropyError { reason: e.to_string() })
    }
}
