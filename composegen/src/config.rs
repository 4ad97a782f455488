use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_BASE_IMAGE: &str = "ubuntu:24.04";
pub const DEFAULT_DOCKERFILE_PATH: &str = "config/Dockerfile.runtime";
pub const DEFAULT_VOLUME_PREFIX: &str = "dusk-node";
pub const DEFAULT_BASE_P2P_PORT: u16 = 18080;
pub const DEFAULT_BASE_RPC_PORT: u16 = 19000;
pub const DEFAULT_CPU_LIMIT: f64 = 2.0;
pub const DEFAULT_MEMORY_LIMIT: &str = "2G";
pub const DEFAULT_STORAGE_LIMIT_RUSK: &str = "19G";
pub const DEFAULT_STORAGE_LIMIT_DATA: &str = "1G";
pub const DEFAULT_NETWORK_NAME: &str = "dusk-net";

/// Defaults loaded from the YAML config file. Every key is optional in the
/// file except `dusk_sysctls`, which has no fallback and is checked at
/// generation time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Defaults {
    pub base_image: Option<String>,
    pub dockerfile_path: Option<String>,
    pub volume_prefix: Option<String>,
    pub base_p2p_port: Option<u16>,
    pub base_rpc_port: Option<u16>,
    pub dusk_sysctls: Option<Vec<String>>,
    pub cpu_limit: Option<f64>,
    pub memory_limit: Option<String>,
    pub storage_limit_rusk: Option<String>,
    pub storage_limit_data: Option<String>,
    pub docker_network_name: Option<String>,
}

/// CLI-supplied overrides. `None` means the flag was not given and the file
/// value (or fallback) stays in effect.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_p2p_port: Option<u16>,
    pub base_rpc_port: Option<u16>,
    pub cpu_limit: Option<f64>,
    pub memory_limit: Option<String>,
    pub storage_limit_rusk: Option<String>,
    pub storage_limit_data: Option<String>,
}

impl Defaults {
    /// Load the defaults file. A missing file is a warning and yields empty
    /// defaults; a file that exists but does not parse is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Error parsing config file: {}", path.display()))
    }

    /// Merge CLI overrides on top, field by field.
    pub fn merge(self, o: Overrides) -> Self {
        Self {
            base_image: self.base_image,
            dockerfile_path: self.dockerfile_path,
            volume_prefix: self.volume_prefix,
            base_p2p_port: o.base_p2p_port.or(self.base_p2p_port),
            base_rpc_port: o.base_rpc_port.or(self.base_rpc_port),
            dusk_sysctls: self.dusk_sysctls,
            cpu_limit: o.cpu_limit.or(self.cpu_limit),
            memory_limit: o.memory_limit.or(self.memory_limit),
            storage_limit_rusk: o.storage_limit_rusk.or(self.storage_limit_rusk),
            storage_limit_data: o.storage_limit_data.or(self.storage_limit_data),
            docker_network_name: self.docker_network_name,
        }
    }

    pub fn base_image(&self) -> &str {
        self.base_image.as_deref().unwrap_or(DEFAULT_BASE_IMAGE)
    }

    pub fn dockerfile_path(&self) -> &str {
        self.dockerfile_path
            .as_deref()
            .unwrap_or(DEFAULT_DOCKERFILE_PATH)
    }

    pub fn volume_prefix(&self) -> &str {
        self.volume_prefix.as_deref().unwrap_or(DEFAULT_VOLUME_PREFIX)
    }

    pub fn base_p2p_port(&self) -> u16 {
        self.base_p2p_port.unwrap_or(DEFAULT_BASE_P2P_PORT)
    }

    pub fn base_rpc_port(&self) -> u16 {
        self.base_rpc_port.unwrap_or(DEFAULT_BASE_RPC_PORT)
    }

    pub fn cpu_limit(&self) -> f64 {
        self.cpu_limit.unwrap_or(DEFAULT_CPU_LIMIT)
    }

    pub fn memory_limit(&self) -> &str {
        self.memory_limit.as_deref().unwrap_or(DEFAULT_MEMORY_LIMIT)
    }

    pub fn storage_limit_rusk(&self) -> &str {
        self.storage_limit_rusk
            .as_deref()
            .unwrap_or(DEFAULT_STORAGE_LIMIT_RUSK)
    }

    pub fn storage_limit_data(&self) -> &str {
        self.storage_limit_data
            .as_deref()
            .unwrap_or(DEFAULT_STORAGE_LIMIT_DATA)
    }

    pub fn docker_network_name(&self) -> &str {
        self.docker_network_name
            .as_deref()
            .unwrap_or(DEFAULT_NETWORK_NAME)
    }

    /// The sysctl list is the one key with no fallback.
    pub fn sysctls(&self) -> Result<&[String]> {
        self.dusk_sysctls
            .as_deref()
            .context("Missing required config key: dusk_sysctls")
    }
}
