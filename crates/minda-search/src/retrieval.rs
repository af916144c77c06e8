//! The retrieval service: threshold/top-k search, optional category filter,
//! and multi-category fan-out with de-duplication and re-ranking.

use std::collections::HashSet;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

use minda_core::models::knowledge::KnowledgeArticle;

use crate::error::SearchError;
use crate::store::VectorStore;

/// Category used when nothing more specific applies.
pub const GENERAL_CATEGORY: &str = "general";

/// Knowledge categories to search for an assessment type. Accepts either an
/// instrument id or its topic; unknown types fall back to `general`.
pub fn categories_for_assessment(assessment_type: &str) -> &'static [&'static str] {
    match assessment_type.trim().to_lowercase().as_str() {
        "phq9" | "depression" => &["depression", GENERAL_CATEGORY],
        "gad7" | "anxiety" => &["anxiety", GENERAL_CATEGORY],
        "k6" | "stress" | "distress" => &["stress", GENERAL_CATEGORY],
        _ => &[GENERAL_CATEGORY],
    }
}

#[async_trait]
pub trait Retriever: Send + Sync {
    /// Nearest neighbours of `query`, descending by similarity, none below
    /// `threshold`, at most `top_k`.
    async fn retrieve(
        &self,
        query: &[f32],
        top_k: usize,
        threshold: f32,
        category: Option<&str>,
    ) -> Result<Vec<KnowledgeArticle>, SearchError>;

    /// One retrieval per category, merged with [`merge_ranked`].
    ///
    /// A failing category is logged and skipped; the call only fails when
    /// every category fails.
    async fn retrieve_across_categories(
        &self,
        query: &[f32],
        categories: &[&str],
        per_category_limit: usize,
        threshold: f32,
    ) -> Result<Vec<KnowledgeArticle>, SearchError> {
        let lookups = categories
            .iter()
            .map(|category| self.retrieve(query, per_category_limit, threshold, Some(*category)));
        let outcomes = join_all(lookups).await;

        let mut batches = Vec::with_capacity(outcomes.len());
        let mut first_error = None;
        for (category, outcome) in categories.iter().zip(outcomes) {
            match outcome {
                Ok(batch) => batches.push(batch),
                Err(e) => {
                    warn!(category = *category, error = %e, "category retrieval failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if batches.is_empty() => Err(e),
            _ => Ok(merge_ranked(batches)),
        }
    }
}

/// Concatenate result batches, keep the first occurrence of each article
/// id, and sort by similarity descending. Ties keep their merged order.
pub fn merge_ranked(batches: Vec<Vec<KnowledgeArticle>>) -> Vec<KnowledgeArticle> {
    let mut seen = HashSet::new();
    let mut merged: Vec<KnowledgeArticle> = batches
        .into_iter()
        .flatten()
        .filter(|a| seen.insert(a.id.clone()))
        .collect();
    merged.sort_by(|a, b| b.similarity().total_cmp(&a.similarity()));
    merged
}

/// [`Retriever`] over any [`VectorStore`].
#[derive(Debug, Clone)]
pub struct VectorRetriever<S> {
    store: S,
}

impl<S: VectorStore> VectorRetriever<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: VectorStore> Retriever for VectorRetriever<S> {
    async fn retrieve(
        &self,
        query: &[f32],
        top_k: usize,
        threshold: f32,
        category: Option<&str>,
    ) -> Result<Vec<KnowledgeArticle>, SearchError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let mut results = match category {
            Some(category) => {
                self.store
                    .match_by_category(query, category, threshold, top_k)
                    .await?
            }
            None => self.store.match_articles(query, threshold, top_k).await?,
        };

        // Stores are external; hold them to the ordering and threshold contract.
        results.retain(|a| a.similarity() >= threshold);
        results.sort_by(|a, b| b.similarity().total_cmp(&a.similarity()));
        results.truncate(top_k);
        Ok(results)
    }
}
