//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ergauth_crypto::NetworkPrefix;
use ergauth_proof::{ProofSettings, DEFAULT_PROOF_TTL_SECS};
use ergauth_store_lmdb::DEFAULT_MAP_SIZE;

use crate::{LogFormat, NodeError};

/// Configuration for a proof service node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Origin wallets use to reach this node; embedded in every challenge's
    /// `replyTo`. Must be reachable from the phone, not just the desktop.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Network whose addresses may be bound: "mainnet" or "testnet".
    #[serde(default = "default_network")]
    pub network: NetworkPrefix,

    /// Non-verified proofs idle this long are deleted.
    #[serde(default = "default_proof_ttl_secs")]
    pub proof_ttl_secs: u64,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ergauth_data")
}

fn default_rpc_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_public_base_url() -> String {
    "http://localhost:7080".to_string()
}

fn default_network() -> NetworkPrefix {
    NetworkPrefix::Mainnet
}

fn default_proof_ttl_secs() -> u64 {
    DEFAULT_PROOF_TTL_SECS
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_lmdb_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject settings the node cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.proof_ttl_secs == 0 {
            return Err(NodeError::Config("proof_ttl_secs must be positive".into()));
        }
        if self.sweep_interval_secs == 0 {
            return Err(NodeError::Config(
                "sweep_interval_secs must be positive".into(),
            ));
        }
        let url = self.public_base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(NodeError::Config(format!(
                "public_base_url must be an http(s) URL, got {url:?}"
            )));
        }
        self.log_format.parse::<LogFormat>()?;
        Ok(())
    }

    pub fn proof_settings(&self) -> ProofSettings {
        ProofSettings {
            network: self.network,
            public_base_url: self.public_base_url.clone(),
            proof_ttl_secs: self.proof_ttl_secs,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            public_base_url: default_public_base_url(),
            network: default_network(),
            proof_ttl_secs: default_proof_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            lmdb_map_size: default_lmdb_map_size(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
