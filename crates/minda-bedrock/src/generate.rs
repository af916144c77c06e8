//! Generative model calls via the Bedrock Converse API.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, StopReason,
    SystemContentBlock,
};
use tracing::{info, warn};

use minda_core::models::chat::{ChatMessage, ChatRole};
use minda_core::models::token_count::TokenUsage;

use crate::error::BedrockError;
use crate::tokens;

const TEMPERATURE: f32 = 0.4;

/// A completed model response.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// A generative model endpoint: a system prompt plus a conversation in,
/// text out.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<Completion, BedrockError>;
}

/// Claude on Bedrock through the Converse API.
#[derive(Debug, Clone)]
pub struct BedrockGenerator {
    client: Client,
    model_id: String,
}

impl BedrockGenerator {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl Generator for BedrockGenerator {
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<Completion, BedrockError> {
        let converse_messages = to_converse_messages(messages)?;

        let inference = InferenceConfiguration::builder()
            .max_tokens(max_tokens.min(i32::MAX as u32) as i32)
            .temperature(TEMPERATURE)
            .build();

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .set_messages(Some(converse_messages))
            .inference_config(inference)
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        if *response.stop_reason() == StopReason::MaxTokens {
            warn!(model_id = %self.model_id, max_tokens, "model output truncated at max_tokens");
        }

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let tokens = response
            .usage()
            .map(tokens::extract_token_usage)
            .unwrap_or_default();
        let usage = tokens::usage_for(&self.model_id, tokens);

        info!(
            model_id = %self.model_id,
            input_tokens = usage.tokens.input,
            output_tokens = usage.tokens.output,
            cost_usd = usage.cost_usd,
            "generation complete"
        );

        Ok(Completion { text, usage })
    }
}

/// Convert chat messages to Converse messages.
///
/// Converse requires the conversation to open with a user turn and to
/// alternate roles, so leading assistant turns are dropped and consecutive
/// turns from the same role are joined.
pub fn to_converse_messages(messages: &[ChatMessage]) -> Result<Vec<Message>, BedrockError> {
    let first_user = messages
        .iter()
        .position(|m| m.role == ChatRole::User)
        .ok_or_else(|| BedrockError::Invocation("conversation has no user message".to_string()))?;

    let mut turns: Vec<(ChatRole, String)> = Vec::new();
    for msg in &messages[first_user..] {
        let continues_turn = turns.last().is_some_and(|(role, _)| *role == msg.role);
        if !continues_turn {
            turns.push((msg.role, msg.content.clone()));
        } else if let Some((_, content)) = turns.last_mut() {
            content.push_str("\n\n");
            content.push_str(&msg.content);
        }
    }

    turns
        .into_iter()
        .map(|(role, content)| {
            let role = match role {
                ChatRole::User => ConversationRole::User,
                ChatRole::Assistant => ConversationRole::Assistant,
            };
            Message::builder()
                .role(role)
                .content(ContentBlock::Text(content))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))
        })
        .collect()
}
