//! Knowledge context builder for prompts.
//!
//! Formats retrieved articles into an XML-style block that is embedded in
//! the system prompt. The block is always well formed: with no articles it
//! carries a sentinel instead of being empty.

use minda_core::models::knowledge::KnowledgeArticle;

/// Characters of article content kept per article by [`compose`].
pub const ARTICLE_CHAR_BUDGET: usize = 1500;

pub const NO_CONTEXT: &str = "No context available.";

pub const TRUNCATION_MARKER: &str = "[...truncated]";

/// Build a context block using the default per-article budget.
pub fn compose(articles: &[KnowledgeArticle]) -> String {
    compose_with_budget(articles, ARTICLE_CHAR_BUDGET)
}

/// Build a context block, cutting each article's content to `budget`
/// characters and appending [`TRUNCATION_MARKER`] when anything was cut.
pub fn compose_with_budget(articles: &[KnowledgeArticle], budget: usize) -> String {
    let mut block = String::from("<knowledge_context>\n");

    if articles.is_empty() {
        block.push_str(NO_CONTEXT);
        block.push('\n');
    }

    for article in articles {
        block.push_str(&format!(
            "<article title=\"{}\" category=\"{}\">\n",
            escape_attr(&article.title),
            escape_attr(&article.category),
        ));
        block.push_str(&truncate(article.content.trim(), budget));
        block.push_str("\n</article>\n");
    }

    block.push_str("</knowledge_context>");
    block
}

/// Cut `text` to at most `budget` chars, never splitting a code point.
fn truncate(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{} {TRUNCATION_MARKER}", text[..byte_idx].trim_end()),
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
