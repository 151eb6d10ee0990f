use thiserror::Error;

/// Failure of the external structured-inference capability.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to {shape}: {message}")]
    SchemaViolation { shape: &'static str, message: String },
}

/// Failure of the embedding or vector-similarity collaborators.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("similarity transport error: {0}")]
    Transport(String),

    #[error("similarity store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("similarity response could not be decoded: {0}")]
    Decode(String),

    #[error("similarity store not configured: {0}")]
    Configuration(String),
}

/// Raised while deriving classification signals from an accumulator.
#[derive(Debug, Clone, Error)]
pub enum ClassificationError {
    #[error("cannot classify a failed flow result: {0}")]
    FailedFlow(String),
}
