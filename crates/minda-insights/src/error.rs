use std::fmt;

use thiserror::Error;

use minda_instruments::error::ScoringError;

/// A pipeline stage that talks to an external service or checks its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embed,
    Retrieve,
    Generate,
    Validate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Embed => "embed",
            Stage::Retrieve => "retrieve",
            Stage::Generate => "generate",
            Stage::Validate => "validate",
        })
    }
}

/// Outcome of a failed stage. Always absorbed by the orchestrator: retrieval
/// failures degrade to empty context, generation and validation failures to
/// the fallback generator.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("embedding service error: {0}")]
    Embedding(String),

    #[error("retrieval service error: {0}")]
    Retrieval(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("schema validation error: {0}")]
    SchemaValidation(String),

    #[error("{stage} timed out after {limit_ms}ms")]
    Timeout { stage: Stage, limit_ms: u64 },
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Embedding(_) => Stage::Embed,
            StageError::Retrieval(_) => Stage::Retrieve,
            StageError::Generation(_) => Stage::Generate,
            StageError::SchemaValidation(_) => Stage::Validate,
            StageError::Timeout { stage, .. } => *stage,
        }
    }
}

/// Caller misuse. The only errors the orchestrator returns.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("chat message is empty")]
    EmptyMessage,
}
