//! Visibility-cleaning reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               VISIBILITY PROXY               │
//!                      │                                              │
//!   Client Request     │  ┌─────────┐      ┌──────────────────────┐  │
//!   ──────────────────▶│  │  http   │─────▶│      upstream        │──┼──▶ Origin
//!                      │  │ server  │      │ url/headers + fetch  │  │    Site
//!                      │  └─────────┘      └──────────┬───────────┘  │
//!                      │                              │              │
//!                      │                              ▼              │
//!                      │                   ┌──────────────────────┐  │
//!   Client Response    │                   │      transform       │  │
//!   ◀──────────────────┼───────────────────│ classify + dispatch  │  │
//!                      │                   │ streaming │ buffered │  │
//!                      │                   └──────────────────────┘  │
//!                      │                                              │
//!                      │  ┌────────────────────────────────────────┐ │
//!                      │  │   config (TOML + env)  │ observability │ │
//!                      │  └────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visibility_proxy::config::loader::load_config;
use visibility_proxy::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "visibility-proxy", version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visibility_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("visibility-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        origin = %config.upstream.origin,
        selectors = config.transform.selectors.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics server
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            visibility_proxy::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
