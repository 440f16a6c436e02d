//! Axum-based RPC server.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ergauth_store::ProofBackend;

use crate::handlers;
use crate::state::RpcState;
use crate::RpcError;

/// Build the router with every endpoint mounted.
pub fn router<S: ProofBackend + 'static>(state: Arc<RpcState<S>>) -> Router {
    Router::new()
        .route(
            "/ergo-mobile-proof/ergo-auth-request",
            get(handlers::ergo_auth_request::<S>),
        )
        .route("/ergo-mobile-proof/p2pk", get(handlers::bind_p2pk::<S>))
        .route("/ergo-mobile-proof/verify", post(handlers::verify::<S>))
        .route("/ergo-mobile-proof/nonce", post(handlers::issue_nonce::<S>))
        .route("/ergo-mobile-proof/initiate", post(handlers::initiate::<S>))
        .route("/ergo-mobile-proof/verified", get(handlers::verified::<S>))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics::<S>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct RpcServer<S> {
    pub host: String,
    pub port: u16,
    pub state: Arc<RpcState<S>>,
}

impl<S: ProofBackend + 'static> RpcServer<S> {
    pub fn new(host: impl Into<String>, port: u16, state: Arc<RpcState<S>>) -> Self {
        Self {
            host: host.into(),
            port,
            state,
        }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn start<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| RpcError::Server(format!("bind {}:{}: {e}", self.host, self.port)))?;
        let addr = listener
            .local_addr()
            .map_err(|e| RpcError::Server(e.to_string()))?;
        tracing::info!("RPC server listening on {addr}");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
