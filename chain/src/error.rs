use thiserror::Error;

/// Errors surfaced by chain-view collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chain data is corrupted: {0}")]
    Corruption(String),
}
