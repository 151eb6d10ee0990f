use thiserror::Error;

/// Failure loading a reference table from disk.
#[derive(Debug, Error)]
pub enum ReferenceTableError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entry {code} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        code: String,
        found: usize,
        expected: usize,
    },
}
