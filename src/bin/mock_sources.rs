//! Mock dataset endpoints
//!
//! Serves local venue and session JSON files over HTTP so venue-analytics can
//! be run without reaching the real endpoints.
//!
//! Routes:
//!   GET /venues   - contents of --venues
//!   GET /sessions - contents of --sessions
//!
//! Usage:
//!   cargo run --bin mock_sources -- --venues data/venues.json --sessions data/sessions.json
//!   VENUES_URL=http://localhost:8080/venues SESSIONS_URL=http://localhost:8080/sessions \
//!     cargo run --bin venue-analytics

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use venue_analytics::io::fixture_server::{serve_fixtures, Fixtures};

#[derive(Parser, Debug)]
#[command(name = "mock_sources")]
#[command(about = "Serve local venue and session datasets over HTTP")]
struct Args {
    /// TCP port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Path to the venues JSON array
    #[arg(long)]
    venues: String,

    /// Path to the sessions JSON array
    #[arg(long)]
    sessions: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    let args = Args::parse();

    let venues = tokio::fs::read(&args.venues)
        .await
        .with_context(|| format!("Failed to read venues file {}", args.venues))?;
    let sessions = tokio::fs::read(&args.sessions)
        .await
        .with_context(|| format!("Failed to read sessions file {}", args.sessions))?;

    // Catch malformed fixtures here rather than in the analyzer
    serde_json::from_slice::<Vec<serde_json::Value>>(&venues)
        .with_context(|| format!("{} is not a JSON array", args.venues))?;
    serde_json::from_slice::<Vec<serde_json::Value>>(&sessions)
        .with_context(|| format!("{} is not a JSON array", args.sessions))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        port = %args.port,
        venues = %args.venues,
        sessions = %args.sessions,
        "mock_sources_ready"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    serve_fixtures(listener, Fixtures::new(venues, sessions), shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
