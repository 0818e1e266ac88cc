use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("row lock could not be acquired: {0}")]
    LockUnavailable(String),

    /// A transactional closure requested rollback. The code string is a
    /// machine-readable marker the caller translates back into its own
    /// error type; nothing written inside the transaction survives.
    #[error("transaction aborted: {0}")]
    Aborted(String),
}
