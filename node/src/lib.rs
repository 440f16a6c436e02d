//! Proof service node: wires LMDB storage, the proof engine, the HTTP
//! server and the expiry sweep together.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod shutdown;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::ProofNode;
pub use shutdown::ShutdownController;
