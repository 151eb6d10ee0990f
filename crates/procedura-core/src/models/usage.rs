//! Token accounting for inference and embedding calls.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub input: u64,
    pub output: u64,
}

impl TokenCount {
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

/// USD per million tokens, per direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPricing {
    pub fn cost_of(&self, tokens: TokenCount) -> f64 {
        (tokens.input as f64 * self.input_per_million
            + tokens.output as f64 * self.output_per_million)
            / 1_000_000.0
    }
}

/// What one call consumed and what it cost. Models without a known price
/// cost zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub tokens: TokenCount,
    pub cost_usd: f64,
}

impl TokenUsage {
    pub fn priced(tokens: TokenCount, pricing: Option<&ModelPricing>) -> Self {
        Self {
            tokens,
            cost_usd: pricing.map_or(0.0, |p| p.cost_of(tokens)),
        }
    }
}
