//! Text embeddings via Amazon Titan Text Embeddings on Bedrock.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_smithy_types::Blob;
use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BedrockError;

/// Concurrent requests issued by the default `embed_batch`.
const BATCH_CONCURRENCY: usize = 4;

/// Converts text into a fixed-length vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, BedrockError>;

    /// Embed several texts. Output order matches input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BedrockError> {
        let futures: Vec<_> = texts.iter().map(|text| self.embed(text)).collect();
        stream::iter(futures)
            .buffered(BATCH_CONCURRENCY)
            .try_collect()
            .await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanEmbedRequest<'a> {
    input_text: &'a str,
    dimensions: usize,
    normalize: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanEmbedResponse {
    embedding: Vec<f32>,
    #[serde(default)]
    input_text_token_count: u64,
}

/// Titan Text Embeddings V2 through `InvokeModel`.
#[derive(Debug, Clone)]
pub struct BedrockEmbedder {
    client: Client,
    model_id: String,
    dimensions: usize,
}

impl BedrockEmbedder {
    pub fn new(client: Client, model_id: impl Into<String>, dimensions: usize) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for BedrockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, BedrockError> {
        if text.trim().is_empty() {
            return Err(BedrockError::Invocation("cannot embed empty text".to_string()));
        }

        let body = serde_json::to_vec(&TitanEmbedRequest {
            input_text: text,
            dimensions: self.dimensions,
            normalize: true,
        })?;

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

        let parsed: TitanEmbedResponse = serde_json::from_slice(response.body().as_ref())
            .map_err(|e| BedrockError::ResponseParse(format!("embedding response: {e}")))?;

        if parsed.embedding.len() != self.dimensions {
            return Err(BedrockError::ResponseParse(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                parsed.embedding.len()
            )));
        }

        debug!(
            model_id = %self.model_id,
            input_tokens = parsed.input_text_token_count,
            "embedding complete"
        );

        Ok(parsed.embedding)
    }
}
