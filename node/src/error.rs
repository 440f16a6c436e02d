use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] ergauth_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] ergauth_store_lmdb::LmdbError),

    #[error("proof error: {0}")]
    Proof(#[from] ergauth_proof::ProofError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RPC server error: {0}")]
    Rpc(String),

    #[error("background task failed: {0}")]
    Task(String),
}
