use procedura_core::error::InferenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("flow '{0}' is not registered")]
    UnknownFlow(String),

    #[error("guard for flow '{flow}' failed: {message}")]
    Guard { flow: String, message: String },

    #[error("flow '{flow}' failed: {message}")]
    Branch { flow: String, message: String },
}
