mod api;
mod docker;
mod types;

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use api::AppState;

#[derive(Parser, Debug)]
#[command(name = "duskfleet-statsd")]
#[command(about = "Host-local HTTP endpoint for container stats", long_about = None)]
struct Args {
    /// Listen port (loopback only)
    #[arg(long, env = "STATS_API_PORT", default_value_t = 5000)]
    port: u16,

    /// Container runtime binary to invoke for stats
    #[arg(long, default_value = "docker")]
    docker_bin: String,

    /// Timeout for the stats subprocess, in seconds
    #[arg(long, default_value_t = 10)]
    stats_timeout: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Dusk fleet stats endpoint");

    // Create application state
    let state = Arc::new(AppState {
        docker_bin: args.docker_bin,
        stats_timeout: Duration::from_secs(args.stats_timeout),
    });

    // Create router
    let app = api::create_router(state);

    // Loopback only, never exposed beyond the host
    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    info!("Listening on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
