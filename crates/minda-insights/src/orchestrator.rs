//! The insight and chat pipeline.
//!
//! Every request passes the crisis gate before any external call. Past the
//! gate: embed, retrieve, compose, generate, validate. Each stage returns a
//! [`StageError`] on failure or timeout; retrieval failures degrade to an
//! empty context and generation or validation failures to the fallback, so
//! only caller misuse ([`InsightError`]) ever reaches the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use minda_bedrock::embed::Embedder;
use minda_bedrock::generate::{Completion, Generator};
use minda_core::models::chat::{ChatMessage, ChatRole};
use minda_core::models::insight::StructuredInsight;
use minda_core::models::knowledge::{ArticleRef, KnowledgeArticle};
use minda_core::models::language::Language;
use minda_core::models::risk::{RiskAssessment, RiskLevel};
use minda_core::models::score::ScoreResult;
use minda_core::models::token_count::TokenUsage;
use minda_instruments::error::ScoringError;
use minda_instruments::get_instrument;
use minda_instruments::scoring::AnswerSet;
use minda_search::retrieval::{Retriever, categories_for_assessment};

use crate::config::PipelineConfig;
use crate::context::compose_with_budget;
use crate::crisis;
use crate::error::{InsightError, Stage, StageError};
use crate::fallback::fallback;
use crate::hotlines::{self, HOTLINES, Hotline, SafetyResponse, mentions_hotline};
use crate::prompts;
use crate::validate::parse_insight;

/// Where the content of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Validated model output.
    Generated,
    /// Deterministic fallback after a failed model path.
    Fallback,
    /// Safety short-circuit; no model involved.
    Crisis,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub assessment_type: String,
    pub answers: AnswerSet,
    #[serde(default)]
    pub prior_risk_level: RiskLevel,
    #[serde(default)]
    pub detected_conditions: Vec<String>,
    /// Optional free text submitted with the assessment.
    #[serde(default)]
    pub free_text: Option<String>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub insight: StructuredInsight,
    pub score: ScoreResult,
    pub risk: RiskAssessment,
    pub source: ResponseSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<SafetyResponse>,
    pub sources: Vec<ArticleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Earlier turns, oldest first. Treated as a read-only snapshot.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub prior_risk_level: RiskLevel,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    pub risk: RiskAssessment,
    pub source: ResponseSource,
    /// The caller must disable further chat input.
    pub chat_blocked: bool,
    pub hotlines: Vec<Hotline>,
    pub sources: Vec<ArticleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Run `fut` under `limit`, mapping elapsed time to [`StageError::Timeout`].
async fn within<T, F>(stage: Stage, limit: Duration, fut: F) -> Result<T, StageError>
where
    F: Future<Output = Result<T, StageError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(outcome) => outcome,
        Err(_) => Err(StageError::Timeout {
            stage,
            limit_ms: limit.as_millis() as u64,
        }),
    }
}

/// The insight and chat controller. Holds no per-request state; share it
/// behind an `Arc`.
pub struct InsightOrchestrator {
    embedder: Arc<dyn Embedder>,
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    config: PipelineConfig,
}

impl InsightOrchestrator {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            retriever,
            generator,
            config,
        }
    }

    /// Score an assessment and produce its structured insight.
    ///
    /// Fails only on caller misuse: an unknown instrument or an invalid
    /// answer set.
    pub async fn generate_insight(
        &self,
        request: &InsightRequest,
    ) -> Result<InsightReport, InsightError> {
        let request_id = Uuid::new_v4();
        let instrument = get_instrument(&request.assessment_type)
            .ok_or_else(|| ScoringError::UnknownInstrument(request.assessment_type.clone()))?;
        let result = instrument.score(&request.answers)?;

        let item_risk = instrument.item_risk(&request.answers);
        let decision = crisis::gate(
            request.prior_risk_level.max(item_risk),
            request.free_text.as_deref(),
        );

        if decision.short_circuit {
            warn!(
                %request_id,
                assessment_type = %request.assessment_type,
                level = %decision.assessment.level,
                "insight short-circuited to safety response"
            );
            return Ok(InsightReport {
                insight: fallback(
                    instrument.id(),
                    result.score,
                    result.max_score,
                    &result.severity,
                    decision.assessment.level,
                ),
                score: result,
                risk: decision.assessment,
                source: ResponseSource::Crisis,
                safety: Some(hotlines::safety_response(request.language)),
                sources: Vec::new(),
                usage: None,
            });
        }
        let risk = decision.assessment;

        let detected_conditions = if request.detected_conditions.is_empty() {
            instrument
                .elevated_items(&request.answers)
                .iter()
                .map(|q| q.text.clone())
                .collect()
        } else {
            request.detected_conditions.clone()
        };

        let query =
            prompts::insight_query(instrument.topic(), &result.severity, &detected_conditions);
        let articles = self
            .retrieve_context(
                request_id,
                &query,
                categories_for_assessment(instrument.id()),
            )
            .await;
        let context = compose_with_budget(&articles, self.config.article_char_budget);
        let sources: Vec<ArticleRef> = articles.iter().map(KnowledgeArticle::to_ref).collect();

        let system_prompt = prompts::insight_system_prompt(&context, result.tier, risk.level);
        let user_message = prompts::insight_user_message(
            instrument.name(),
            &result,
            &detected_conditions,
            &instrument.to_structured_input(&request.answers),
        );

        let outcome = match self
            .complete(
                &system_prompt,
                &[ChatMessage::user(user_message)],
                self.config.insight_max_tokens,
            )
            .await
        {
            Ok(completion) => parse_insight(&completion.text, result.tier, risk.level)
                .map(|draft| (draft, completion.usage)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok((draft, usage)) => {
                info!(
                    %request_id,
                    assessment_type = %request.assessment_type,
                    articles = sources.len(),
                    tokens = usage.tokens.total(),
                    "insight generated"
                );
                Ok(InsightReport {
                    insight: StructuredInsight {
                        content: draft,
                        generated_at: jiff::Timestamp::now(),
                        assessment_type: instrument.id().to_string(),
                        severity: result.severity.clone(),
                        score: result.score,
                    },
                    score: result,
                    risk,
                    source: ResponseSource::Generated,
                    safety: None,
                    sources,
                    usage: Some(usage),
                })
            }
            Err(e) => {
                warn!(
                    %request_id,
                    stage = %e.stage(),
                    error = %e,
                    "insight generation failed, using fallback"
                );
                Ok(InsightReport {
                    insight: fallback(
                        instrument.id(),
                        result.score,
                        result.max_score,
                        &result.severity,
                        risk.level,
                    ),
                    score: result,
                    risk,
                    source: ResponseSource::Fallback,
                    safety: None,
                    sources,
                    usage: None,
                })
            }
        }
    }

    /// Answer one chat message.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, InsightError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(InsightError::EmptyMessage);
        }
        let request_id = Uuid::new_v4();

        let decision = crisis::gate(request.prior_risk_level, Some(message));
        if decision.short_circuit {
            warn!(%request_id, level = %decision.assessment.level, "chat short-circuited to safety response");
            let safety = hotlines::safety_response(request.language);
            return Ok(ChatReply {
                message: safety.message,
                risk: safety.risk,
                source: ResponseSource::Crisis,
                chat_blocked: true,
                hotlines: safety.hotlines,
                sources: Vec::new(),
                usage: None,
            });
        }
        let risk = decision.assessment;
        let elevated = risk.is_crisis;

        let articles = self.retrieve_context(request_id, message, &[]).await;
        let context = compose_with_budget(&articles, self.config.article_char_budget);
        let sources: Vec<ArticleRef> = articles.iter().map(KnowledgeArticle::to_ref).collect();

        let system_prompt = prompts::chat_system_prompt(request.language, &context, elevated);
        let mut messages = recent_turns(&request.history, self.config.history_turns).to_vec();
        messages.push(ChatMessage::user(message));

        let (mut text, source, usage) = match self
            .complete(&system_prompt, &messages, self.config.chat_max_tokens)
            .await
        {
            Ok(completion) if !completion.text.trim().is_empty() => {
                info!(
                    %request_id,
                    articles = sources.len(),
                    tokens = completion.usage.tokens.total(),
                    "chat reply generated"
                );
                (completion.text, ResponseSource::Generated, Some(completion.usage))
            }
            Ok(_) => {
                warn!(%request_id, stage = %Stage::Validate, "empty chat reply, using fallback");
                (chat_fallback(request.language), ResponseSource::Fallback, None)
            }
            Err(e) => {
                warn!(%request_id, stage = %e.stage(), error = %e, "chat generation failed, using fallback");
                (chat_fallback(request.language), ResponseSource::Fallback, None)
            }
        };

        if elevated && !mentions_hotline(&text) {
            text.push_str("\n\n");
            text.push_str(&hotlines::safety_addendum(request.language));
        }

        Ok(ChatReply {
            message: text,
            risk,
            source,
            chat_blocked: elevated,
            hotlines: if elevated { HOTLINES.to_vec() } else { Vec::new() },
            sources,
            usage,
        })
    }

    /// Embed `query` and retrieve articles for it. Never fails: any stage
    /// error is logged and yields an empty list.
    ///
    /// With no categories the whole corpus is searched; otherwise one lookup
    /// per category is merged. At most `top_k` articles are returned.
    async fn retrieve_context(
        &self,
        request_id: Uuid,
        query: &str,
        categories: &[&str],
    ) -> Vec<KnowledgeArticle> {
        match self.try_retrieve(query, categories).await {
            Ok(mut articles) => {
                articles.truncate(self.config.top_k);
                articles
            }
            Err(e) => {
                warn!(%request_id, stage = %e.stage(), error = %e, "retrieval degraded to empty context");
                Vec::new()
            }
        }
    }

    async fn try_retrieve(
        &self,
        query: &str,
        categories: &[&str],
    ) -> Result<Vec<KnowledgeArticle>, StageError> {
        let vector = within(Stage::Embed, self.config.embed_timeout, async {
            self.embedder
                .embed(query)
                .await
                .map_err(|e| StageError::Embedding(e.to_string()))
        })
        .await?;

        let threshold = self.config.similarity_threshold;
        within(Stage::Retrieve, self.config.retrieval_timeout, async {
            let found = if categories.is_empty() {
                self.retriever
                    .retrieve(&vector, self.config.top_k, threshold, None)
                    .await
            } else {
                self.retriever
                    .retrieve_across_categories(
                        &vector,
                        categories,
                        self.config.per_category_limit,
                        threshold,
                    )
                    .await
            };
            found.map_err(|e| StageError::Retrieval(e.to_string()))
        })
        .await
    }

    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<Completion, StageError> {
        within(Stage::Generate, self.config.generation_timeout, async {
            self.generator
                .complete(system_prompt, messages, max_tokens)
                .await
                .map_err(|e| StageError::Generation(e.to_string()))
        })
        .await
    }
}

/// The tail of `history` holding its last `turns` user turns, each with the
/// assistant replies that follow it. Assistant messages before the first kept
/// user message are dropped.
pub fn recent_turns(history: &[ChatMessage], turns: usize) -> &[ChatMessage] {
    if turns == 0 {
        return &[];
    }
    let start = history
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, m)| m.role == ChatRole::User)
        .nth(turns - 1)
        .map(|(i, _)| i);
    match start {
        Some(i) => &history[i..],
        None => {
            let first_user = history
                .iter()
                .position(|m| m.role == ChatRole::User)
                .unwrap_or(history.len());
            &history[first_user..]
        }
    }
}

/// Canned supportive reply used when chat generation fails.
pub fn chat_fallback(language: Language) -> String {
    language
        .pick(
            "I'm sorry, I can't respond properly right now. What you're feeling matters. \
             Taking a few slow breaths or talking to someone you trust can help in the \
             meantime, and please try again in a little while.",
            "Maaf, saya tidak dapat memberi respons dengan baik sekarang. Perasaan anda \
             penting. Bernafas perlahan-lahan atau berbual dengan seseorang yang anda \
             percayai boleh membantu buat sementara waktu, dan sila cuba lagi sebentar lagi.",
        )
        .to_string()
}
