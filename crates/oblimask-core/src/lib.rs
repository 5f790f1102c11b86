//! Oblimask protocol logic.
//!
//! The server side of oblivious masking as a transport-free library. A caller
//! first obtains encrypted single-use masks, then submits them together with
//! its data. The server opens each token and returns the data multiplied by
//! the mask, without ever holding a mask between the two calls.
//!
//! # Components
//!
//! - [`MaskingProtocol`]: the two operations, bound to one [`MaskingKey`]
//! - [`wire`]: JSON request and response shapes
//! - [`Environment`]: randomness source, swapped for seeded sources in tests
//! - [`MaskingError`]: the three failure kinds reported to callers
//!
//! [`MaskingKey`]: oblimask_crypto::MaskingKey

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod env;
pub mod error;
mod protocol;
pub mod wire;

pub use config::{DEFAULT_MASK_COUNT, DEFAULT_MAX_BATCH, ProtocolConfig};
pub use env::{EntropyError, Environment};
pub use error::{ErrorKind, MaskingError};
pub use protocol::MaskingProtocol;
pub use wire::{
    ApplyRequest, ApplyResponse, DataEncoding, ErrorResponse, MaskRequest, MaskResponse, Request,
    Response, Status,
};
