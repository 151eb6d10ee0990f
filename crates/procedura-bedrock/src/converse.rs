//! Structured inference over the Bedrock Converse API.
//!
//! Every call sends one system prompt and one user message. The system
//! prompt is the step's instructions followed by the JSON skeleton of the
//! requested [`OutputShape`]; the reply text is parsed into a JSON value.
//! Checking that value against the concrete record type is the caller's job.

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use procedura_core::error::InferenceError;
use procedura_core::gateway::{BoxFuture, InferenceGateway, InferenceRequest, OutputShape};
use procedura_core::models::usage::TokenUsage;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::BedrockError;
use crate::{json, tokens};

const MAX_OUTPUT_TOKENS: i32 = 4096;

#[derive(Clone)]
pub struct BedrockGateway {
    client: Client,
    model_id: String,
    temperature: f32,
}

impl BedrockGateway {
    pub fn from_client(client: Client, model_id: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            temperature,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Run one request and return the parsed JSON object.
    pub async fn converse_json(&self, request: &InferenceRequest) -> Result<Value, BedrockError> {
        let call_id = Uuid::new_v4();
        info!(
            call_id = %call_id,
            model = %self.model_id,
            shape = request.shape.name(),
            input_len = request.user_message.len(),
            "invoking model"
        );

        let system_prompt = with_shape_instructions(&request.system_prompt, request.shape);
        let (text, usage) = self.invoke_converse(&system_prompt, &request.user_message).await?;

        info!(
            call_id = %call_id,
            shape = request.shape.name(),
            input_tokens = usage.tokens.input,
            output_tokens = usage.tokens.output,
            total_tokens = usage.tokens.total(),
            cost_usd = usage.cost_usd,
            "model call complete"
        );

        json::extract_json_object(&text)
    }

    /// Core invocation. Returns the concatenated response text and token
    /// usage.
    async fn invoke_converse(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<(String, TokenUsage), BedrockError> {
        let pricing = tokens::get_pricing(&self.model_id);

        let inference_config = InferenceConfiguration::builder()
            .temperature(self.temperature)
            .max_tokens(MAX_OUTPUT_TOKENS)
            .build();

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .messages(
                Message::builder()
                    .role(ConversationRole::User)
                    .content(ContentBlock::Text(user_message.to_string()))
                    .build()
                    .map_err(|e| BedrockError::Invocation(e.to_string()))?,
            )
            .inference_config(inference_config)
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let response_text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let usage = response
            .usage()
            .map(|u| tokens::calculate_cost(tokens::extract_token_usage(u), pricing.as_ref()))
            .unwrap_or_default();

        Ok((response_text, usage))
    }
}

impl InferenceGateway for BedrockGateway {
    fn infer(&self, request: InferenceRequest) -> BoxFuture<'_, Result<Value, InferenceError>> {
        Box::pin(async move {
            self.converse_json(&request)
                .await
                .map_err(InferenceError::from)
        })
    }
}

/// Append the answer format to a step's system prompt.
pub fn with_shape_instructions(system_prompt: &str, shape: OutputShape) -> String {
    format!(
        "{}\n\nResponda exclusivamente com um único objeto JSON válido, sem texto adicional, \
         seguindo exatamente este formato:\n{}",
        system_prompt.trim_end(),
        shape.schema_hint()
    )
}
