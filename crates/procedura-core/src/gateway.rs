//! Narrow interfaces to the external collaborators: structured inference,
//! text embedding, and vector-similarity lookup.
//!
//! Implementations live in `procedura-bedrock` and `procedura-search`;
//! tests substitute in-process fakes.

use std::future::Future;
use std::pin::Pin;

use crate::error::{InferenceError, SearchError};
use crate::models::similarity::SimilarityRecord;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The record shape an inference call must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputShape {
    ProcedureExtraction,
    PathologyExtraction,
    Reconciliation,
    Decoding,
    SpecimenIdentification,
    TraumaVerification,
    SameDiseaseVerification,
}

impl OutputShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProcedureExtraction => "ProcedureExtraction",
            Self::PathologyExtraction => "PathologyExtraction",
            Self::Reconciliation => "Reconciliation",
            Self::Decoding => "Decoding",
            Self::SpecimenIdentification => "SpecimenIdentification",
            Self::TraumaVerification => "TraumaVerification",
            Self::SameDiseaseVerification => "SameDiseaseVerification",
        }
    }

    /// JSON skeleton the model is asked to fill in.
    pub fn schema_hint(&self) -> &'static str {
        match self {
            Self::ProcedureExtraction | Self::Reconciliation => {
                r#"{"procedimentos_identificados": [{"procedimento": "string", "descricao": "string", "diagnostico": "string | null"}]}"#
            }
            Self::PathologyExtraction => {
                r#"{"procedimentos_laudo": [{"procedimento": "string", "descricao": "string", "peca_anatomica": "string | null", "diagnostico": "string | null"}]}"#
            }
            Self::Decoding => {
                r#"{"procedimentos_decodificados": [{"procedimento": {"procedimento": "string", "descricao": "string"}, "codigo": "string", "tratar_cancer": false}]}"#
            }
            Self::SpecimenIdentification => {
                r#"{"retirada_peca_anatomica": false, "justificativa": "string"}"#
            }
            Self::TraumaVerification => r#"{"entrada_por_trauma": false, "justificativa": "string"}"#,
            Self::SameDiseaseVerification => r#"{"mesma_doenca": false, "justificativa": "string"}"#,
        }
    }
}

/// A rendered prompt plus the shape its answer must take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub shape: OutputShape,
    pub system_prompt: String,
    pub user_message: String,
}

impl InferenceRequest {
    pub fn new(
        shape: OutputShape,
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            shape,
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
        }
    }
}

/// Text-to-structured-data inference.
pub trait InferenceGateway: Send + Sync {
    /// Run the prompt and return a JSON value conforming to `request.shape`.
    /// Conformance beyond "is a JSON value" is checked by the caller.
    fn infer(
        &self,
        request: InferenceRequest,
    ) -> BoxFuture<'_, Result<serde_json::Value, InferenceError>>;
}

pub trait Embedder: Send + Sync {
    fn embed(&self, text: String) -> BoxFuture<'_, Result<Vec<f32>, SearchError>>;
}

/// Nearest-neighbour lookup over the reference table.
pub trait SimilarityStore: Send + Sync {
    /// Up to `match_count` records, most similar first. An empty result is
    /// not an error; only transport or decoding failures are.
    fn search(
        &self,
        query_embedding: Vec<f32>,
        match_count: usize,
    ) -> BoxFuture<'_, Result<Vec<SimilarityRecord>, SearchError>>;
}
