//! A running proof service node.
//!
//! Owns the LMDB environment, the proof engine, the RPC server task and the
//! expiry sweep task. Both tasks stop on the shared shutdown broadcast.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use ergauth_crypto::OsRandom;
use ergauth_proof::ProofEngine;
use ergauth_rpc::{ProofMetrics, RpcServer, RpcState};
use ergauth_store_lmdb::LmdbEnvironment;
use ergauth_types::{Clock, SystemClock};

use crate::config::NodeConfig;
use crate::shutdown::ShutdownController;
use crate::NodeError;

/// How long [`ProofNode::stop`] waits for background tasks.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ProofNode {
    pub config: NodeConfig,
    pub store: Arc<LmdbEnvironment>,
    pub metrics: Arc<ProofMetrics>,
    pub shutdown: Arc<ShutdownController>,
    state: Arc<RpcState<LmdbEnvironment>>,
    /// Handles for spawned background tasks (joined during shutdown).
    task_handles: Vec<JoinHandle<()>>,
}

impl ProofNode {
    /// Open storage at `config.data_dir` and build the proof engine.
    /// Call [`start`](Self::start) to begin serving.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        config.validate()?;

        let store = Arc::new(LmdbEnvironment::open(
            &config.data_dir,
            config.lmdb_map_size,
        )?);
        let metrics = Arc::new(ProofMetrics::new());
        let engine = ProofEngine::new(
            Arc::clone(&store),
            clock,
            Arc::new(OsRandom),
            config.proof_settings(),
        );
        let state = Arc::new(RpcState::new(engine, Arc::clone(&metrics)));

        Ok(Self {
            config,
            store,
            metrics,
            shutdown: Arc::new(ShutdownController::new()),
            state,
            task_handles: Vec::new(),
        })
    }

    pub fn engine(&self) -> &ProofEngine<LmdbEnvironment> {
        &self.state.engine
    }

    /// Run one expiry sweep and record it in the metrics.
    pub fn sweep_once(&self) -> Result<usize, NodeError> {
        sweep(&self.state)
    }

    /// Spawn the RPC server and the expiry sweep, then wait for SIGINT or
    /// SIGTERM.
    pub async fn start(&mut self) -> Result<(), NodeError> {
        let rpc_addr = format!("{}:{}", self.config.rpc_host, self.config.rpc_port);
        tracing::info!(
            network = self.config.network.as_str(),
            rpc = %rpc_addr,
            public_base_url = %self.config.public_base_url,
            data_dir = %self.config.data_dir.display(),
            "proof node starting"
        );

        self.spawn_services();
        tracing::info!("proof node started");

        self.shutdown.wait_for_signal().await;
        Ok(())
    }

    /// Spawn the background tasks without waiting for a signal.
    pub fn spawn_services(&mut self) {
        self.spawn_reaper();
        self.spawn_rpc();
    }

    fn spawn_reaper(&mut self) {
        let state = Arc::clone(&self.state);
        let period = Duration::from_secs(self.config.sweep_interval_secs);
        let mut shutdown_rx = self.shutdown.subscribe();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        tracing::info!("expiry sweep shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let state = Arc::clone(&state);
                        match tokio::task::spawn_blocking(move || sweep(&state)).await {
                            Ok(Ok(_)) => {}
                            Ok(Err(e)) => tracing::warn!("expiry sweep failed: {e}"),
                            Err(e) => tracing::error!("expiry sweep task panicked: {e}"),
                        }
                    }
                }
            }
        });
        self.task_handles.push(handle);
    }

    fn spawn_rpc(&mut self) {
        let server = RpcServer::new(
            self.config.rpc_host.clone(),
            self.config.rpc_port,
            Arc::clone(&self.state),
        );
        let shutdown = self.shutdown.signalled();

        let handle = tokio::spawn(async move {
            match server.start(shutdown).await {
                Ok(()) => tracing::info!("RPC server exited"),
                Err(e) => tracing::error!("RPC server error: {e}"),
            }
        });
        self.task_handles.push(handle);
    }

    /// Stop the node gracefully.
    ///
    /// Signals every background task, waits for them (with a timeout) and
    /// flushes LMDB.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        tracing::info!("proof node stopping");
        self.shutdown.shutdown();

        let handles: Vec<JoinHandle<()>> = self.task_handles.drain(..).collect();
        let wait_all = async {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!("background task ended abnormally: {e}");
                }
            }
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, wait_all)
            .await
            .is_err()
        {
            tracing::warn!(
                "shutdown timeout ({:?}), some tasks may still be running",
                SHUTDOWN_TIMEOUT
            );
        }

        self.store.force_sync()?;
        tracing::info!("proof node stopped");
        Ok(())
    }
}

fn sweep(state: &RpcState<LmdbEnvironment>) -> Result<usize, NodeError> {
    let removed = state.engine.reaper.sweep()?;
    state.metrics.proofs_reaped.inc_by(removed as u64);
    Ok(removed)
}
