//! Text embeddings via Amazon Titan (`InvokeModel`).
//!
//! The reference table was indexed with `amazon.titan-embed-text-v1`
//! (1536 dimensions); queries must use the same model.

use aws_sdk_bedrockruntime::Client;
use aws_smithy_types::Blob;
use procedura_core::error::SearchError;
use procedura_core::gateway::{BoxFuture, Embedder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BedrockError;

pub const DEFAULT_EMBEDDING_MODEL: &str = "amazon.titan-embed-text-v1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResponse {
    embedding: Vec<f32>,
    #[serde(default)]
    input_text_token_count: Option<u64>,
}

#[derive(Clone)]
pub struct TitanEmbedder {
    client: Client,
    model_id: String,
}

impl TitanEmbedder {
    pub fn from_client(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>, BedrockError> {
        let body = serde_json::to_vec(&TitanRequest { input_text: text })?;

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let parsed: TitanResponse = serde_json::from_slice(response.body().as_ref())
            .map_err(|e| BedrockError::ResponseParse(format!("invalid embedding response: {e}")))?;

        if parsed.embedding.is_empty() {
            return Err(BedrockError::ResponseParse("empty embedding".to_string()));
        }

        info!(
            model = %self.model_id,
            dimensions = parsed.embedding.len(),
            input_tokens = parsed.input_text_token_count.unwrap_or(0),
            "text embedded"
        );

        Ok(parsed.embedding)
    }
}

impl Embedder for TitanEmbedder {
    fn embed(&self, text: String) -> BoxFuture<'_, Result<Vec<f32>, SearchError>> {
        Box::pin(async move { self.embed_text(&text).await.map_err(SearchError::from) })
    }
}
