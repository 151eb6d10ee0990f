//! procedura-bedrock
//!
//! Bedrock-backed implementations of the inference and embedding
//! collaborators: structured JSON answers over the Converse API and Titan
//! text embeddings over `InvokeModel`.

pub mod client;
pub mod converse;
pub mod embed;
pub mod error;
pub mod json;
pub mod tokens;

pub use converse::BedrockGateway;
pub use embed::TitanEmbedder;
