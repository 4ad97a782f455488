mod compose;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{Defaults, Overrides};

#[derive(Parser, Debug)]
#[command(name = "duskfleet-composegen")]
#[command(about = "Generate docker-compose.yml for a fleet of Dusk nodes", long_about = None)]
struct Args {
    /// Number of nodes
    #[arg(long, default_value_t = 3)]
    nodes: u16,

    /// Network type
    #[arg(long, value_enum, default_value_t = NodeNetwork::Mainnet)]
    network: NodeNetwork,

    /// Node feature
    #[arg(long, value_enum, default_value_t = NodeFeature::Default)]
    feature: NodeFeature,

    /// Base host port for P2P
    #[arg(long)]
    base_p2p: Option<u16>,

    /// Base host port for RPC
    #[arg(long)]
    base_rpc: Option<u16>,

    /// CPU limit per node
    #[arg(long)]
    cpu_limit: Option<f64>,

    /// Memory limit per node (e.g. 4G)
    #[arg(long)]
    memory_limit: Option<String>,

    /// Storage quota for each node's state volume
    #[arg(long)]
    storage_limit_rusk: Option<String>,

    /// Storage quota for each node's keys/config volume
    #[arg(long)]
    storage_limit_data: Option<String>,

    /// Output file
    #[arg(long, default_value = "docker-compose.yml")]
    output: PathBuf,

    /// Configuration file path
    #[arg(long, default_value = "config/docker-compose-config.yml")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NodeNetwork {
    Mainnet,
    Testnet,
}

impl fmt::Display for NodeNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeNetwork::Mainnet => write!(f, "mainnet"),
            NodeNetwork::Testnet => write!(f, "testnet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NodeFeature {
    Default,
    Archive,
}

impl fmt::Display for NodeFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeFeature::Default => write!(f, "default"),
            NodeFeature::Archive => write!(f, "archive"),
        }
    }
}

fn main() -> Result<()> {
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

    if args.nodes == 0 {
        anyhow::bail!("--nodes must be at least 1");
    }

    // Load defaults, then apply CLI overrides for the flags that were given
    let defaults = Defaults::load(&args.config)?;
    let cfg = defaults.merge(Overrides {
        base_p2p_port: args.base_p2p,
        base_rpc_port: args.base_rpc,
        cpu_limit: args.cpu_limit,
        memory_limit: args.memory_limit,
        storage_limit_rusk: args.storage_limit_rusk,
        storage_limit_data: args.storage_limit_data,
    });

    info!(
        "Generating {} for {} nodes ({}, {})",
        args.output.display(),
        args.nodes,
        args.network,
        args.feature
    );

    let manifest = compose::generate(
        args.nodes,
        &cfg,
        &args.network.to_string(),
        &args.feature.to_string(),
    )?;

    let yaml = serde_yaml::to_string(&manifest).context("Failed to serialize manifest")?;
    std::fs::write(&args.output, yaml)
        .with_context(|| format!("Error writing to file {}", args.output.display()))?;

    info!("Generated {}", args.output.display());
    info!("  Nodes: {}", args.nodes);
    info!(
        "  P2P ports: {} - {}",
        cfg.base_p2p_port() + 1,
        cfg.base_p2p_port() + args.nodes
    );
    info!(
        "  RPC ports: {} - {}",
        cfg.base_rpc_port() + 1,
        cfg.base_rpc_port() + args.nodes
    );
    info!("  CPU limit: {}", cfg.cpu_limit());
    info!("  Memory limit: {}", cfg.memory_limit());
    info!("  Rusk storage limit: {}", cfg.storage_limit_rusk());
    info!("  Data storage limit: {}", cfg.storage_limit_data());

    Ok(())
}
