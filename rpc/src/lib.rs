//! HTTP surface of the mobile wallet proof flow.
//!
//! Wire contract used by wallets:
//! - `GET  /ergo-mobile-proof/ergo-auth-request?verificationId&address`
//! - `GET  /ergo-mobile-proof/p2pk?verificationId&p2pkAddress`
//! - `POST /ergo-mobile-proof/verify?verificationId` with `{signedMessage, proof}`
//!
//! Used by the desktop session and other services:
//! - `POST /ergo-mobile-proof/nonce`, `POST /ergo-mobile-proof/initiate`
//! - `GET  /ergo-mobile-proof/verified?address`
//! - `GET  /health`, `GET /metrics`

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod state;

pub use error::RpcError;
pub use metrics::ProofMetrics;
pub use server::{router, RpcServer};
pub use state::RpcState;
