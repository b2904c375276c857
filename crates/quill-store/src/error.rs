//! Store error types.

/// Persistence error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The addressed record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The request payload is unusable (empty title, missing content, ...).
    #[error("{0}")]
    Validation(String),
}
