//! Content gateway server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                CONTENT GATEWAY               │
//!     Browser request    │  ┌────────┐   ┌─────────┐   ┌────────────┐  │
//!     ───────────────────┼─▶│  http  │──▶│ gateway │──▶│ multipart  │  │
//!                        │  │ server │   │  route  │   │  encoder   │  │
//!                        │  └────────┘   └────┬────┘   └─────┬──────┘  │
//!                        │                    │              ▼         │
//!                        │                    │        ┌────────────┐  │
//!                        │                    │        │  upstream  │◀─┼──▶ GitHub / Whisper /
//!                        │                    │        │   client   │  │    video API
//!     JSON envelope      │  ┌────────┐        │        └─────┬──────┘  │
//!     ◀──────────────────┼──│response│◀───────┴──────────────┘         │
//!                        │  │normalize│                                │
//!                        │  └────────┘                                 │
//!                        │  config · observability · security · lifecycle
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use content_gateway::config::{load_config, GatewayConfig};
use content_gateway::lifecycle::{signals, Shutdown};
use content_gateway::observability::{logging, metrics};
use content_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "content-gateway")]
#[command(about = "Stateless proxy for OAuth, transcription and video generation APIs", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("content-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    log_configuration(&config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Log which upstreams can be served, without ever printing their secrets.
fn log_configuration(config: &GatewayConfig) {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.security.max_body_size,
        github_oauth = config.github.credentials().is_some(),
        transcription = config.transcription.api_key.is_some(),
        video_generation = config.video.api_key.is_some(),
        "Configuration loaded"
    );
    if config.github.credentials().is_none() {
        tracing::warn!("GitHub OAuth credentials missing; /api/github-oauth will answer 500");
    }
    if config.transcription.api_key.is_none() {
        tracing::warn!("Transcription API key missing; /api/transcribe will answer 500");
    }
    if config.video.api_key.is_none() {
        tracing::warn!("Video API key missing; /api/generate-video will answer 500");
    }
}
