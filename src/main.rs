//! Session-affine forwarding HTTP proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               FORWARDING PROXY                │
//!                    │                                               │
//!   Caller JSON      │  ┌─────────┐    ┌───────────┐   ┌──────────┐ │
//!   ─────────────────┼─▶│  http   │───▶│  forward  │──▶│ outbound │─┼──▶ Target
//!                    │  │ server  │    │ forwarder │   │  client  │ │    Server
//!                    │  └─────────┘    └─────┬─────┘   └──────────┘ │
//!                    │                       │                      │
//!                    │                       ▼                      │
//!                    │               ┌──────────────┐               │
//!   Caller JSON      │               │   affinity   │               │
//!   ◀────────────────┼───────────────│    cache     │               │
//!                    │               └──────────────┘               │
//!                    │                                               │
//!                    │  config · lifecycle · observability           │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forward_proxy::config::{load_config, ProxyConfig};
use forward_proxy::http::HttpServer;
use forward_proxy::lifecycle::{trigger_on_ctrl_c, Shutdown};

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "Session-affine forwarding HTTP proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forward_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("forward-proxy v0.1.0 starting");

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        affinity_capacity = config.affinity.capacity,
        affinity_ttl_secs = config.affinity.ttl_secs,
        default_timeout_secs = config.forward.default_timeout_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            forward_proxy::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    trigger_on_ctrl_c(&shutdown);

    // Create and run HTTP server
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
