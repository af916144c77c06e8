//! Integration tests against real Bedrock endpoints.
//!
//! These tests require valid AWS credentials in the environment and model
//! access for Titan Text Embeddings V2 and a Claude inference profile.
//!
//! Run with: `cargo test -p minda-bedrock --test live_bedrock -- --ignored`

use minda_bedrock::client::{build_runtime_client, load_sdk_config};
use minda_bedrock::embed::{BedrockEmbedder, Embedder};
use minda_bedrock::generate::{BedrockGenerator, Generator};
use minda_core::models::chat::ChatMessage;

const EMBEDDING_MODEL: &str = "amazon.titan-embed-text-v2:0";
const CHAT_MODEL: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

async fn client() -> aws_sdk_bedrockruntime::Client {
    let config = load_sdk_config(Some("us-east-1".to_string())).await;
    build_runtime_client(&config)
}

#[tokio::test]
#[ignore]
async fn embedding_has_requested_dimensions() {
    let embedder = BedrockEmbedder::new(client().await, EMBEDDING_MODEL, 512);
    let vector = embedder
        .embed("Trouble sleeping and low energy")
        .await
        .expect("embed should succeed");
    assert_eq!(vector.len(), 512);
}

#[tokio::test]
#[ignore]
async fn batch_embedding_preserves_order() {
    let embedder = BedrockEmbedder::new(client().await, EMBEDDING_MODEL, 256);
    let texts = vec![
        "breathing exercises for anxiety".to_string(),
        "sleep hygiene".to_string(),
        "breathing exercises for anxiety".to_string(),
    ];
    let vectors = embedder.embed_batch(&texts).await.expect("batch should succeed");
    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors[0], vectors[2]);
}

#[tokio::test]
#[ignore]
async fn generation_returns_text() {
    let generator = BedrockGenerator::new(client().await, CHAT_MODEL);
    let completion = generator
        .complete(
            "Reply with the single word: ready",
            &[ChatMessage::user("Are you there?")],
            16,
        )
        .await
        .expect("generation should succeed");
    assert!(!completion.text.is_empty());
    assert!(completion.usage.tokens.output > 0);
}
