//! LMDB storage backend for wallet ownership proofs.
//!
//! Implements the storage traits from `ergauth-store` using the `heed` LMDB
//! bindings. Each logical table maps to one LMDB database within a single
//! environment. LMDB admits one write transaction at a time, so every
//! conditional update below runs its read-check-write inside one write
//! transaction and is atomic with respect to every other writer.

pub mod environment;
pub mod error;
pub mod proof;
pub mod user;

pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
