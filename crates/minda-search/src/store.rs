use async_trait::async_trait;
use tracing::warn;

use minda_core::models::knowledge::KnowledgeArticle;

use crate::error::SearchError;

/// A similarity-search primitive over the knowledge corpus.
///
/// Results carry `similarity_score`, exclude anything below `threshold`,
/// and come back in descending similarity order.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn match_articles(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<KnowledgeArticle>, SearchError>;

    async fn match_by_category(
        &self,
        query: &[f32],
        category: &str,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<KnowledgeArticle>, SearchError>;
}

/// Exact cosine search over articles held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    articles: Vec<KnowledgeArticle>,
    dimensions: Option<usize>,
}

impl InMemoryVectorStore {
    /// Build a store. Articles without an embedding, or whose embedding
    /// length differs from the first embedded article, are skipped.
    pub fn new(articles: Vec<KnowledgeArticle>) -> Self {
        let dimensions = articles
            .iter()
            .map(|a| a.embedding.len())
            .find(|len| *len > 0);

        let articles: Vec<KnowledgeArticle> = articles
            .into_iter()
            .filter(|a| {
                let ok = Some(a.embedding.len()) == dimensions;
                if !ok {
                    warn!(
                        article_id = %a.id,
                        len = a.embedding.len(),
                        "skipping article with missing or mismatched embedding"
                    );
                }
                ok
            })
            .collect();

        Self {
            articles,
            dimensions,
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    fn search<'a>(
        &self,
        query: &[f32],
        candidates: impl Iterator<Item = &'a KnowledgeArticle>,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<KnowledgeArticle>, SearchError> {
        let Some(dimensions) = self.dimensions else {
            return Ok(Vec::new());
        };
        if query.len() != dimensions {
            return Err(SearchError::DimensionMismatch {
                expected: dimensions,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, &KnowledgeArticle)> = candidates
            .map(|a| (cosine_similarity(query, &a.embedding), a))
            .filter(|(score, _)| *score >= threshold)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(score, article)| KnowledgeArticle {
                embedding: Vec::new(),
                similarity_score: Some(score),
                ..article.clone()
            })
            .collect())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn match_articles(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<KnowledgeArticle>, SearchError> {
        self.search(query, self.articles.iter(), threshold, limit)
    }

    async fn match_by_category(
        &self,
        query: &[f32],
        category: &str,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<KnowledgeArticle>, SearchError> {
        let candidates = self.articles.iter().filter(|a| a.category == category);
        self.search(query, candidates, threshold, limit)
    }
}

/// Cosine similarity. Zero vectors have similarity 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
