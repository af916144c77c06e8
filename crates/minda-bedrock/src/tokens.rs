use minda_core::models::token_count::{TokenCount, TokenUsage};

/// Extract token counts from a Bedrock Converse response.
pub fn extract_token_usage(usage: &aws_sdk_bedrockruntime::types::TokenUsage) -> TokenCount {
    TokenCount {
        input: usage.input_tokens.max(0) as u64,
        output: usage.output_tokens.max(0) as u64,
    }
}

/// Approximate on-demand pricing per million (input, output) tokens.
/// Update as pricing changes.
fn pricing_per_million(model_id: &str) -> Option<(f64, f64)> {
    match model_id {
        id if id.contains("claude-opus-4") => Some((15.0, 75.0)),
        id if id.contains("claude-sonnet-4") => Some((3.0, 15.0)),
        id if id.contains("claude-haiku-4") => Some((1.0, 5.0)),
        id if id.contains("claude-3-5-haiku") => Some((0.80, 4.0)),
        id if id.contains("titan-embed-text-v2") => Some((0.02, 0.0)),
        _ => None,
    }
}

/// Attach a cost estimate to a token count. Unknown models cost zero.
pub fn usage_for(model_id: &str, tokens: TokenCount) -> TokenUsage {
    let cost_usd = pricing_per_million(model_id)
        .map(|(input, output)| {
            (tokens.input as f64 / 1_000_000.0) * input
                + (tokens.output as f64 / 1_000_000.0) * output
        })
        .unwrap_or(0.0);
    TokenUsage { tokens, cost_usd }
}
