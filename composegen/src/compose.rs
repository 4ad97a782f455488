use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Defaults;

// Ports inside the container are fixed by the node image.
pub const P2P_CONTAINER_PORT: u16 = 8080;
pub const RPC_CONTAINER_PORT: u16 = 9000;

// ============================================================================
// Manifest Model
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ComposeFile {
    pub version: String,
    pub services: BTreeMap<String, Service>,
    pub volumes: BTreeMap<String, Volume>,
    pub networks: BTreeMap<String, NetworkDef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub build: Build,
    pub container_name: String,
    pub restart: String,
    pub ports: Vec<String>,
    pub volumes: Vec<String>,
    pub environment: Vec<String>,
    pub sysctls: Vec<String>,
    pub deploy: Deploy,
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Build {
    pub context: String,
    pub dockerfile: String,
    pub args: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Deploy {
    pub resources: Resources,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resources {
    pub limits: Limits,
}

#[derive(Debug, Clone, Serialize)]
pub struct Limits {
    pub cpus: f64,
    pub memory: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Volume {
    pub driver_opts: DriverOpts,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverOpts {
    pub size: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkDef {
    pub name: String,
    pub driver: String,
}

// ============================================================================
// Generation
// ============================================================================

/// Render the compose document for `nodes` services.
///
/// Host ports and volume names are unique across the set because every node
/// maps `index -> base + index` with a distinct prefix-index name.
pub fn generate(nodes: u16, cfg: &Defaults, network: &str, feature: &str) -> Result<ComposeFile> {
    let sysctls = cfg.sysctls()?.to_vec();

    let prefix = cfg.volume_prefix();
    let base_p2p = cfg.base_p2p_port();
    let base_rpc = cfg.base_rpc_port();
    let net_name = cfg.docker_network_name().to_string();

    let mut compose = ComposeFile {
        version: "3.8".to_string(),
        services: BTreeMap::new(),
        volumes: BTreeMap::new(),
        networks: BTreeMap::from([(
            net_name.clone(),
            NetworkDef {
                name: net_name.clone(),
                driver: "bridge".to_string(),
            },
        )]),
    };

    for i in 1..=nodes {
        let node_name = format!("{}-{}", prefix, i);
        let host_p2p = base_p2p
            .checked_add(i)
            .with_context(|| format!("P2P port for {} exceeds 65535", node_name))?;
        let host_rpc = base_rpc
            .checked_add(i)
            .with_context(|| format!("RPC port for {} exceeds 65535", node_name))?;

        let service = Service {
            build: Build {
                context: ".".to_string(),
                dockerfile: cfg.dockerfile_path().to_string(),
                args: BTreeMap::from([("BASE_IMAGE".to_string(), cfg.base_image().to_string())]),
            },
            container_name: node_name.clone(),
            restart: "unless-stopped".to_string(),
            ports: vec![
                format!("{}:{}", host_p2p, P2P_CONTAINER_PORT),
                format!("{}:{}", host_rpc, RPC_CONTAINER_PORT),
            ],
            volumes: vec![
                format!("{}-data:/home/dusk/.dusk", node_name),
                format!("{}-rusk:/opt/dusk/rusk", node_name),
            ],
            environment: vec![
                format!("DUSK_NETWORK={}", network),
                format!("DUSK_FEATURE={}", feature),
                "DUSK_USER=dusk".to_string(),
                "RUST_LOG=info".to_string(),
            ],
            sysctls: sysctls.clone(),
            deploy: Deploy {
                resources: Resources {
                    limits: Limits {
                        cpus: cfg.cpu_limit(),
                        memory: cfg.memory_limit().to_string(),
                    },
                },
            },
            networks: vec![net_name.clone()],
        };

        compose.services.insert(node_name.clone(), service);

        compose.volumes.insert(
            format!("{}-data", node_name),
            Volume {
                driver_opts: DriverOpts {
                    size: cfg.storage_limit_data().to_string(),
                },
            },
        );
        compose.volumes.insert(
            format!("{}-rusk", node_name),
            Volume {
                driver_opts: DriverOpts {
                    size: cfg.storage_limit_rusk().to_string(),
                },
            },
        );
    }

    Ok(compose)
}
