//! The masking protocol: obtain-mask and apply-mask.
//!
//! [`MaskingProtocol`] owns the process-scoped [`MaskingKey`] and a randomness
//! [`Environment`]. It keeps no per-request state: a token carries its own
//! mask, so apply-mask depends only on the key and the request.
//!
//! # Atomicity
//!
//! Both operations either succeed for every slot or return a single error and
//! no output. Slots are processed in order and the first failure wins.

use oblimask_crypto::{
    CryptoError, DataElement, EncryptedMaskToken, KEY_SIZE, MASK_SEED_SIZE, Mask, MaskingKey,
    NONCE_SIZE, decode, decode_bytes, encode, open_mask, seal_mask,
};
use zeroize::Zeroizing;

use crate::{
    config::ProtocolConfig,
    env::Environment,
    error::MaskingError,
    wire::{ApplyResponse, DataEncoding, MaskResponse, Request, Response},
};

/// Seeds drawn before giving up on a non-zero mask.
///
/// A uniform seed reduces to zero with probability 2^-252, so repeated zeros
/// mean the randomness source is broken.
const MAX_MASK_ATTEMPTS: usize = 4;

/// Stateless masking service bound to one key.
///
/// Shared read-only across workers; both operations take `&self`.
pub struct MaskingProtocol<E: Environment> {
    key: MaskingKey,
    env: E,
    config: ProtocolConfig,
}

impl<E: Environment> MaskingProtocol<E> {
    /// Create a protocol instance around an existing key.
    pub fn new(key: MaskingKey, env: E, config: ProtocolConfig) -> Self {
        Self { key, env, config }
    }

    /// Create a protocol instance with a fresh key drawn from `env`.
    ///
    /// # Errors
    ///
    /// - `CryptoFailure`: the randomness source failed
    pub fn generate(env: E, config: ProtocolConfig) -> Result<Self, MaskingError> {
        let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
        env.random_bytes(bytes.as_mut_slice())?;
        let key = MaskingKey::from_bytes(*bytes);

        tracing::debug!("generated masking key");
        Ok(Self::new(key, env, config))
    }

    /// Active limits.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Issue `count` fresh encrypted masks.
    ///
    /// Every token holds an independent mask; nothing is cached.
    ///
    /// # Errors
    ///
    /// - `MalformedInput`: `count` is zero or above `max_batch`
    /// - `CryptoFailure`: the randomness source or cipher failed
    pub fn obtain_masks(&self, count: usize) -> Result<Vec<String>, MaskingError> {
        self.check_batch(count)?;

        let tokens = (0..count)
            .map(|_| self.issue_token().map(|token| encode(&token)))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count, "issued masks");
        Ok(tokens)
    }

    /// Apply the masks inside `tokens` to the index-aligned `data`.
    ///
    /// # Errors
    ///
    /// - `MalformedInput`: mismatched lengths, empty or oversized batch, bad
    ///   base64, wrong token length, non-canonical element
    /// - `InvalidToken`: a token failed authentication under the current key
    /// - `CryptoFailure`: the cipher failed for a reason other than
    ///   authentication
    pub fn apply_masks(
        &self,
        tokens: &[String],
        data: &[String],
        encoding: DataEncoding,
    ) -> Result<Vec<String>, MaskingError> {
        if tokens.len() != data.len() {
            return Err(MaskingError::malformed(format!(
                "mask and data lists differ in length ({} vs {})",
                tokens.len(),
                data.len()
            )));
        }
        self.check_batch(tokens.len())?;

        let masked = tokens
            .iter()
            .zip(data)
            .enumerate()
            .map(|(index, (token, item))| self.apply_slot(index, token, item, encoding))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = masked.len(), "applied masks");
        Ok(masked)
    }

    /// Execute a request from the dispatching endpoint.
    ///
    /// # Errors
    ///
    /// Whatever the selected operation returns.
    pub fn handle(&self, request: Request) -> Result<Response, MaskingError> {
        match request {
            Request::Mask(req) => {
                self.obtain_masks(req.count()).map(MaskResponse::new).map(Response::Mask)
            },
            Request::Apply(req) => self
                .apply_masks(&req.mask, &req.data, req.encoding)
                .map(ApplyResponse::new)
                .map(Response::Apply),
        }
    }

    fn key(&self) -> &MaskingKey {
        &self.key
    }

    fn check_batch(&self, count: usize) -> Result<(), MaskingError> {
        if count == 0 {
            return Err(MaskingError::malformed("batch must contain at least one slot"));
        }
        if count > self.config.max_batch {
            return Err(MaskingError::malformed(format!(
                "batch of {count} exceeds the limit of {}",
                self.config.max_batch
            )));
        }
        Ok(())
    }

    fn issue_token(&self) -> Result<EncryptedMaskToken, MaskingError> {
        let mask = self.fresh_mask()?;
        let nonce = self.env.random_array::<NONCE_SIZE>()?;

        seal_mask(self.key(), &mask, nonce).map_err(|err| {
            tracing::error!(error = %err, "sealing mask failed");
            MaskingError::CryptoFailure { reason: err.to_string() }
        })
    }

    fn fresh_mask(&self) -> Result<Mask, MaskingError> {
        for _ in 0..MAX_MASK_ATTEMPTS {
            let seed = Zeroizing::new(self.env.random_array::<MASK_SEED_SIZE>()?);
            match Mask::from_seed(&seed) {
                Ok(mask) => return Ok(mask),
                Err(CryptoError::ZeroMask) => tracing::warn!("mask seed reduced to zero"),
                Err(err) => return Err(MaskingError::CryptoFailure { reason: err.to_string() }),
            }
        }

        tracing::error!(attempts = MAX_MASK_ATTEMPTS, "randomness source yields only zero masks");
        Err(MaskingError::CryptoFailure {
            reason: format!("no usable mask after {MAX_MASK_ATTEMPTS} attempts"),
        })
    }

    fn apply_slot(
        &self,
        index: usize,
        token: &str,
        item: &str,
        encoding: DataEncoding,
    ) -> Result<String, MaskingError> {
        let token: EncryptedMaskToken = decode(token)
            .map_err(|err| MaskingError::malformed(format!("mask[{index}]: {err}")))?;

        let mask = open_mask(self.key(), &token).map_err(|err| {
            if err.is_authentication_failure() {
                tracing::warn!(index, "rejected mask token");
                MaskingError::InvalidToken { index }
            } else {
                tracing::error!(index, error = %err, "opening mask token failed");
                MaskingError::CryptoFailure { reason: err.to_string() }
            }
        })?;

        let element = match encoding {
            DataEncoding::Element => decode::<DataElement>(item),
            DataEncoding::Raw => decode_bytes(item).map(|bytes| DataElement::hash(&bytes)),
        }
        .map_err(|err| MaskingError::malformed(format!("data[{index}]: {err}")))?;

        Ok(encode(&mask.apply(&element)))
    }
}
