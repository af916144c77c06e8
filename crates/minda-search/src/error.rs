use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("corpus snapshot not found in S3")]
    CorpusNotFound,

    #[error("embedding dimension mismatch (corpus {expected}, query {actual})")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector store unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(#[from] minda_storage::error::StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
