//! Error types for the hash tree.

use tradesim_types::TxnHash;

/// Errors that can occur during hash tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A transaction with this key is already recorded and the collision
    /// policy rejects duplicates.
    #[error("duplicate key: {0}")]
    DuplicateKey(TxnHash),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A writer panicked while holding the shared tree lock.
    #[error("tree lock poisoned")]
    LockPoisoned,
}

/// Convenience alias for hash tree results.
pub type DbResult<T> = Result<T, TreeError>;
