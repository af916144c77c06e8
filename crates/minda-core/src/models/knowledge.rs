use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::language::Language;

/// An article from the knowledge corpus. Authored and embedded outside this
/// system; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct KnowledgeArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub language: Language,
    /// Precomputed embedding. Omitted from API responses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[ts(skip)]
    pub embedding: Vec<f32>,
    /// Cosine similarity to the query; set only on retrieval results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub similarity_score: Option<f32>,
}

impl KnowledgeArticle {
    pub fn similarity(&self) -> f32 {
        self.similarity_score.unwrap_or(0.0)
    }

    /// A light reference suitable for returning to the client as a source.
    pub fn to_ref(&self) -> ArticleRef {
        ArticleRef {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            similarity: self.similarity(),
        }
    }
}

/// A citation of a retrieved article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ArticleRef {
    pub id: String,
    pub title: String,
    pub category: String,
    pub similarity: f32,
}
