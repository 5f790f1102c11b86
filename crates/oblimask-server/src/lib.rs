//! Oblimask production server.
//!
//! Serves [`oblimask_core`]'s masking protocol over HTTP with actix-web and
//! the OS RNG.
//!
//! # Architecture
//!
//! The protocol is transport-free and stateless. This crate supplies the
//! production "glue": [`Server`] draws a fresh masking key at startup, wraps
//! the protocol in shared read-only state, and hands it to every worker.
//! Restarting the process discards the key, so tokens issued before the
//! restart are rejected afterwards.
//!
//! # Components
//!
//! - [`Server`]: binds and runs the HTTP server
//! - [`handlers`]: routes and the error-to-response mapping
//! - [`SystemEnv`]: production environment (OS crypto RNG)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod handlers;
mod system_env;

use actix_web::{App, HttpServer, middleware::Logger, web};
pub use error::ServerError;
pub use handlers::ApiError;
use oblimask_core::{MaskingProtocol, ProtocolConfig};
pub use system_env::SystemEnv;

/// Default request body limit (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Address to bind to (e.g., "127.0.0.1:5000")
    pub bind_address: String,
    /// Worker threads; `None` uses one per physical core
    pub workers: Option<usize>,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Protocol limits
    pub protocol: ProtocolConfig,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            workers: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            protocol: ProtocolConfig::default(),
        }
    }
}

impl ServerRuntimeConfig {
    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.bind_address.trim().is_empty() {
            return Err(ServerError::Config("bind address is empty".to_string()));
        }
        if self.workers == Some(0) {
            return Err(ServerError::Config("worker count must be at least 1".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(ServerError::Config("body limit must be at least 1 byte".to_string()));
        }
        if self.protocol.max_batch == 0 {
            return Err(ServerError::Config("max batch must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Production Oblimask server.
///
/// Owns the protocol instance, and with it the only copy of the masking key.
pub struct Server {
    protocol: web::Data<MaskingProtocol<SystemEnv>>,
    config: ServerRuntimeConfig,
}

impl Server {
    /// Validate the configuration and generate a fresh masking key.
    pub fn new(config: ServerRuntimeConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let protocol = MaskingProtocol::generate(SystemEnv::new(), config.protocol.clone())?;
        tracing::info!(max_batch = config.protocol.max_batch, "masking key generated");

        Ok(Self { protocol: web::Data::new(protocol), config })
    }

    /// Bind the listener and serve until shutdown.
    ///
    /// Returns after a shutdown signal (SIGINT/SIGTERM) once in-flight
    /// requests have drained.
    pub async fn run(self) -> Result<(), ServerError> {
        let protocol = self.protocol;
        let max_body_bytes = self.config.max_body_bytes;

        let mut server = HttpServer::new(move || {
            let protocol = protocol.clone();
            App::new()
                .wrap(Logger::default())
                .configure(|cfg| handlers::configure(cfg, protocol, max_body_bytes))
        });
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server.bind(&self.config.bind_address).map_err(|e| {
            ServerError::Transport(format!("failed to bind {}: {e}", self.config.bind_address))
        })?;
        for addr in server.addrs() {
            tracing::info!(%addr, "server listening");
        }

        server.run().await?;

        tracing::info!("server stopped");
        Ok(())
    }
}
