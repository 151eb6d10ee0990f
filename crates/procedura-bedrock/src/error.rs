use procedura_core::error::{InferenceError, SearchError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BedrockError> for InferenceError {
    fn from(e: BedrockError) -> Self {
        match e {
            BedrockError::Invocation(msg) => InferenceError::Invocation(msg),
            BedrockError::ResponseParse(msg) => InferenceError::ResponseParse(msg),
            BedrockError::Serialization(e) => InferenceError::ResponseParse(e.to_string()),
        }
    }
}

impl From<BedrockError> for SearchError {
    fn from(e: BedrockError) -> Self {
        SearchError::Embedding(e.to_string())
    }
}
