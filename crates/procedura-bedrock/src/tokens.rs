use procedura_core::models::usage::{ModelPricing, TokenCount, TokenUsage};

/// Extract token counts from a Bedrock Converse response.
pub fn extract_token_usage(usage: &aws_sdk_bedrockruntime::types::TokenUsage) -> TokenCount {
    TokenCount {
        input: usage.input_tokens.max(0) as u64,
        output: usage.output_tokens.max(0) as u64,
    }
}

/// Attach a cost to a token count. Unknown models cost zero.
pub fn calculate_cost(tokens: TokenCount, pricing: Option<&ModelPricing>) -> TokenUsage {
    TokenUsage::priced(tokens, pricing)
}

/// Known model pricing (per million tokens). Matched by substring so that
/// regional inference profiles (`us.`, `eu.`, `global.`) resolve too.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    match model_id {
        id if id.contains("claude-opus-4") => Some(ModelPricing {
            input_per_million: 15.0,
            output_per_million: 75.0,
        }),
        id if id.contains("claude-sonnet-4") || id.contains("claude-3-7-sonnet") => {
            Some(ModelPricing {
                input_per_million: 3.0,
                output_per_million: 15.0,
            })
        }
        id if id.contains("claude-3-5-haiku") || id.contains("claude-haiku") => {
            Some(ModelPricing {
                input_per_million: 0.80,
                output_per_million: 4.0,
            })
        }
        id if id.contains("titan-embed-text") => Some(ModelPricing {
            input_per_million: 0.10,
            output_per_million: 0.0,
        }),
        _ => None,
    }
}
