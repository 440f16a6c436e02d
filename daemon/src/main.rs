//! Proof service daemon: entry point for running a node.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use ergauth_crypto::NetworkPrefix;
use ergauth_node::{init_logging, LogFormat, NodeConfig, ProofNode};

#[derive(Parser)]
#[command(name = "ergauth-daemon", about = "Ergo wallet ownership proof service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ERGAUTH_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB environment.
    #[arg(long, env = "ERGAUTH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Network whose addresses may be bound: "mainnet" or "testnet".
    #[arg(long, env = "ERGAUTH_NETWORK")]
    network: Option<NetworkPrefix>,

    #[arg(long, env = "ERGAUTH_RPC_HOST")]
    rpc_host: Option<String>,

    #[arg(long, env = "ERGAUTH_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Externally reachable origin, used in every challenge's `replyTo`.
    #[arg(long, env = "ERGAUTH_PUBLIC_BASE_URL")]
    public_base_url: Option<String>,

    /// Idle seconds before a non-verified proof is deleted.
    #[arg(long, env = "ERGAUTH_PROOF_TTL_SECS")]
    proof_ttl_secs: Option<u64>,

    #[arg(long, env = "ERGAUTH_SWEEP_INTERVAL_SECS")]
    sweep_interval_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ERGAUTH_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ERGAUTH_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the node until SIGINT or SIGTERM.
    Run,
    /// Print the effective configuration as TOML and exit.
    Config,
}

impl Cli {
    /// File settings (or defaults) with CLI flags and env vars applied.
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let base = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => NodeConfig::default(),
        };

        Ok(NodeConfig {
            data_dir: self.data_dir.clone().unwrap_or(base.data_dir),
            network: self.network.unwrap_or(base.network),
            rpc_host: self.rpc_host.clone().unwrap_or(base.rpc_host),
            rpc_port: self.rpc_port.unwrap_or(base.rpc_port),
            public_base_url: self
                .public_base_url
                .clone()
                .unwrap_or(base.public_base_url),
            proof_ttl_secs: self.proof_ttl_secs.unwrap_or(base.proof_ttl_secs),
            sweep_interval_secs: self.sweep_interval_secs.unwrap_or(base.sweep_interval_secs),
            log_format: self.log_format.clone().unwrap_or(base.log_format),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            ..base
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;
    config.validate()?;

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Run => {
            let format: LogFormat = config.log_format.parse()?;
            init_logging(format, &config.log_level)?;
            if let Some(path) = &cli.config {
                tracing::info!("loaded config from {}", path.display());
            }

            let mut node = ProofNode::new(config).context("opening node")?;
            node.start().await?;

            tracing::info!("shutdown signal received, stopping node");
            node.stop().await?;
            tracing::info!("daemon exited cleanly");
        }
    }

    Ok(())
}
