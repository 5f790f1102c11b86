//! Oblimask client.
//!
//! Talks to an Oblimask server over HTTP. Raw inputs are hashed into the
//! group locally; the server only ever sees group elements and the tokens it
//! issued.
//!
//! ```no_run
//! # async fn run() -> Result<(), oblimask_client::ClientError> {
//! use oblimask_client::{ClientConfig, MaskingClient};
//!
//! let client = MaskingClient::new(ClientConfig::new("http://127.0.0.1:5000"))?;
//! let masked = client.mask_inputs(&["alice@example.com"]).await?;
//! # let _ = masked;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod config;
mod error;

pub use client::MaskingClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::ClientError;
