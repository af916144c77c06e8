use std::time::Duration;

/// Tuning for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub embed_timeout: Duration,
    pub retrieval_timeout: Duration,
    pub generation_timeout: Duration,
    /// Articles kept for the prompt.
    pub top_k: usize,
    /// Articles fetched per category on the insights path.
    pub per_category_limit: usize,
    pub similarity_threshold: f32,
    /// Most recent conversation turns passed to the chat model. A turn
    /// starts at a user message and runs to the next one.
    pub history_turns: usize,
    /// Characters of each article's content included in the prompt.
    pub article_char_budget: usize,
    pub insight_max_tokens: u32,
    pub chat_max_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            embed_timeout: Duration::from_secs(8),
            retrieval_timeout: Duration::from_secs(5),
            generation_timeout: Duration::from_secs(30),
            top_k: 5,
            per_category_limit: 3,
            similarity_threshold: 0.5,
            history_turns: 6,
            article_char_budget: crate::context::ARTICLE_CHAR_BUDGET,
            insight_max_tokens: 2048,
            chat_max_tokens: 1024,
        }
    }
}
