use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use minda_core::models::knowledge::KnowledgeArticle;
use minda_storage::error::StorageError;
use minda_storage::objects;

use crate::error::SearchError;
use crate::store::InMemoryVectorStore;

/// Default S3 key of the corpus snapshot.
pub const CORPUS_KEY: &str = "knowledge/corpus.json";

/// A knowledge corpus with precomputed embeddings, as published by the
/// content pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusSnapshot {
    /// Embedding model the vectors were produced with.
    pub embedding_model_id: String,
    pub dimensions: usize,
    pub articles: Vec<KnowledgeArticle>,
}

/// A corpus loaded into memory, with the ETag of the snapshot it came from.
pub struct LoadedCorpus {
    pub store: InMemoryVectorStore,
    pub embedding_model_id: String,
    pub etag: String,
}

impl CorpusSnapshot {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SearchError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Build the store, failing if the snapshot's own vectors disagree with
    /// its declared dimensions.
    pub fn into_store(self) -> Result<InMemoryVectorStore, SearchError> {
        let store = InMemoryVectorStore::new(self.articles);
        match store.dimensions() {
            Some(actual) if actual != self.dimensions => Err(SearchError::DimensionMismatch {
                expected: self.dimensions,
                actual,
            }),
            _ => Ok(store),
        }
    }
}

/// Download the corpus snapshot from S3 and load it into memory.
pub async fn download_corpus(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<LoadedCorpus, SearchError> {
    info!(bucket, key, "downloading knowledge corpus");

    let (snapshot, etag): (CorpusSnapshot, String) = objects::get_json(client, bucket, key)
        .await
        .map_err(|e| match e {
            StorageError::NotFound { .. } => SearchError::CorpusNotFound,
            other => SearchError::Storage(other),
        })?;

    let embedding_model_id = snapshot.embedding_model_id.clone();
    let store = snapshot.into_store()?;

    info!(
        articles = store.len(),
        dimensions = ?store.dimensions(),
        embedding_model_id = %embedding_model_id,
        "knowledge corpus loaded"
    );

    Ok(LoadedCorpus {
        store,
        embedding_model_id,
        etag,
    })
}
