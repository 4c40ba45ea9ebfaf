//! Error taxonomy for the core engine.
//!
//! Absent rows are not errors: lookups return `Option` and deletes return a
//! bool. Everything else that can fail maps onto one of the variants below.

/// Errors returned by the storage and retrieval core.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    /// The embedding backend failed. Never swallowed — a memory without an
    /// embedding cannot be stored or searched.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// I/O or constraint failure in the persistence layer.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Two vectors of different lengths were compared. This violates the
    /// store-wide dimension invariant and indicates a defect, not a
    /// recoverable condition.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Stored payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience alias used throughout the core modules.
pub type Result<T> = std::result::Result<T, EngramError>;
