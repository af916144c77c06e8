use std::sync::Arc;

use minda_insights::orchestrator::InsightOrchestrator;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<InsightOrchestrator>,
    /// Articles in the loaded knowledge corpus.
    pub corpus_articles: usize,
    pub chat_model_id: String,
}
