//! Integration tests against real Bedrock.
//!
//! These tests call real AWS APIs and require valid credentials in the
//! environment with access to the Claude and Titan models.
//!
//! Run with: `cargo test -p procedura-bedrock --test live -- --ignored`

use procedura_bedrock::client::{load_config, runtime_client};
use procedura_bedrock::embed::DEFAULT_EMBEDDING_MODEL;
use procedura_bedrock::{BedrockGateway, TitanEmbedder};
use procedura_core::gateway::{InferenceGateway, InferenceRequest, OutputShape};

const MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

#[tokio::test]
#[ignore]
async fn trauma_verification_returns_boolean_field() {
    let config = load_config("us-east-1").await;
    let gateway = BedrockGateway::from_client(runtime_client(&config), MODEL_ID, 0.0);

    let value = gateway
        .infer(InferenceRequest::new(
            OutputShape::TraumaVerification,
            "Determine se o paciente deu entrada no hospital por trauma ou acidente.",
            "Paciente vítima de colisão automobilística, admitido com fratura de fêmur.",
        ))
        .await
        .unwrap();

    println!("{value:#}");
    assert!(value["entrada_por_trauma"].is_boolean());
}

#[tokio::test]
#[ignore]
async fn titan_embedding_has_reference_dimensions() {
    let config = load_config("us-east-1").await;
    let embedder = TitanEmbedder::from_client(runtime_client(&config), DEFAULT_EMBEDDING_MODEL);

    let vector = embedder.embed_text("colecistectomia videolaparoscópica").await.unwrap();
    assert_eq!(vector.len(), 1536);
}
