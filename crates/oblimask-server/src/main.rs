//! Oblimask server binary.
//!
//! # Usage
//!
//! ```bash
//! # Local development on the default port
//! oblimask-server
//!
//! # Public interface, larger batches
//! oblimask-server --bind 0.0.0.0:8080 --max-batch 4096
//! ```

use clap::Parser;
use oblimask_core::ProtocolConfig;
use oblimask_server::{DEFAULT_MAX_BODY_BYTES, Server, ServerRuntimeConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Oblimask masking server
#[derive(Parser, Debug)]
#[command(name = "oblimask-server")]
#[command(about = "Oblivious masking service")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    bind: String,

    /// Worker threads (default: one per physical core)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Maximum masks issued or applied per request
    #[arg(long, default_value_t = oblimask_core::DEFAULT_MAX_BATCH)]
    max_batch: usize,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Oblimask server starting");

    let config = ServerRuntimeConfig {
        bind_address: args.bind,
        workers: args.workers,
        max_body_bytes: args.max_body_bytes,
        protocol: ProtocolConfig { max_batch: args.max_batch },
    };

    let server = Server::new(config)?;
    server.run().await?;

    Ok(())
}
