//! Protocol configuration.

/// Masks issued when a request does not ask for a specific count
pub const DEFAULT_MASK_COUNT: usize = 1;

/// Default upper bound on slots per call
pub const DEFAULT_MAX_BATCH: usize = 1024;

/// Limits applied by [`crate::MaskingProtocol`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Maximum number of masks issued, or slots applied, in one call
    pub max_batch: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self { max_batch: DEFAULT_MAX_BATCH }
    }
}
