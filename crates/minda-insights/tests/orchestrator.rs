use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use minda_bedrock::embed::Embedder;
use minda_bedrock::error::BedrockError;
use minda_bedrock::generate::{Completion, Generator};
use minda_core::models::chat::{ChatMessage, ChatRole};
use minda_core::models::insight::Priority;
use minda_core::models::knowledge::KnowledgeArticle;
use minda_core::models::language::Language;
use minda_core::models::risk::RiskLevel;
use minda_core::models::token_count::TokenUsage;
use minda_insights::config::PipelineConfig;
use minda_insights::context::NO_CONTEXT;
use minda_insights::error::InsightError;
use minda_insights::fallback::fallback_draft;
use minda_insights::hotlines::mentions_hotline;
use minda_insights::orchestrator::{
    ChatRequest, InsightOrchestrator, InsightRequest, ResponseSource, recent_turns,
};
use minda_instruments::error::ScoringError;
use minda_instruments::scoring::AnswerSet;
use minda_search::error::SearchError;
use minda_search::retrieval::Retriever;

// --- fakes ---

const HANG: Duration = Duration::from_secs(30);

#[derive(Default)]
struct FakeEmbedder {
    calls: AtomicUsize,
    fail: bool,
    hang: bool,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, BedrockError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            tokio::time::sleep(HANG).await;
        }
        if self.fail {
            Err(BedrockError::Invocation("embedding endpoint unreachable".into()))
        } else {
            Ok(vec![1.0, 0.0, 0.0])
        }
    }
}

#[derive(Default)]
struct FakeRetriever {
    calls: AtomicUsize,
    fail: bool,
    hang: bool,
    categories: Mutex<Vec<String>>,
}

#[async_trait]
impl Retriever for FakeRetriever {
    async fn retrieve(
        &self,
        _query: &[f32],
        top_k: usize,
        _threshold: f32,
        category: Option<&str>,
    ) -> Result<Vec<KnowledgeArticle>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            tokio::time::sleep(HANG).await;
        }
        if self.fail {
            return Err(SearchError::Unavailable("store offline".into()));
        }
        let category = category.unwrap_or("general").to_string();
        self.categories.lock().unwrap().push(category.clone());
        Ok((0..top_k)
            .map(|i| KnowledgeArticle {
                id: format!("{category}-{i}"),
                title: format!("{category} article {i}"),
                content: "Regular sleep and gentle exercise help mood.".into(),
                category: category.clone(),
                language: Language::En,
                embedding: Vec::new(),
                similarity_score: Some(0.9 - i as f32 * 0.1),
            })
            .collect())
    }
}

enum Behaviour {
    Reply(String),
    Fail,
    Hang,
}

struct FakeGenerator {
    calls: AtomicUsize,
    behaviour: Behaviour,
    system_prompts: Mutex<Vec<String>>,
    conversations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeGenerator {
    fn new(behaviour: Behaviour) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            behaviour,
            system_prompts: Mutex::new(Vec::new()),
            conversations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        _max_tokens: u32,
    ) -> Result<Completion, BedrockError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.system_prompts.lock().unwrap().push(system_prompt.to_string());
        self.conversations.lock().unwrap().push(messages.to_vec());
        match &self.behaviour {
            Behaviour::Reply(text) => Ok(Completion {
                text: text.clone(),
                usage: TokenUsage::default(),
            }),
            Behaviour::Fail => Err(BedrockError::Invocation("throttled".into())),
            Behaviour::Hang => {
                tokio::time::sleep(HANG).await;
                Err(BedrockError::Invocation("unreachable".into()))
            }
        }
    }
}

struct Harness {
    embedder: Arc<FakeEmbedder>,
    retriever: Arc<FakeRetriever>,
    generator: Arc<FakeGenerator>,
    orchestrator: InsightOrchestrator,
}

impl Harness {
    fn new(embedder: FakeEmbedder, retriever: FakeRetriever, generator: FakeGenerator) -> Self {
        let embedder = Arc::new(embedder);
        let retriever = Arc::new(retriever);
        let generator = Arc::new(generator);
        let config = PipelineConfig {
            embed_timeout: Duration::from_millis(50),
            retrieval_timeout: Duration::from_millis(50),
            generation_timeout: Duration::from_millis(50),
            ..PipelineConfig::default()
        };
        let orchestrator =
            InsightOrchestrator::new(embedder.clone(), retriever.clone(), generator.clone(), config);
        Self {
            embedder,
            retriever,
            generator,
            orchestrator,
        }
    }

    fn healthy(behaviour: Behaviour) -> Self {
        Self::new(
            FakeEmbedder::default(),
            FakeRetriever::default(),
            FakeGenerator::new(behaviour),
        )
    }

    fn outage() -> Self {
        Self::new(
            FakeEmbedder {
                fail: true,
                ..Default::default()
            },
            FakeRetriever {
                fail: true,
                ..Default::default()
            },
            FakeGenerator::new(Behaviour::Fail),
        )
    }

    fn external_calls(&self) -> usize {
        self.embedder.calls.load(Ordering::SeqCst)
            + self.retriever.calls.load(Ordering::SeqCst)
            + self.generator.calls.load(Ordering::SeqCst)
    }
}

fn phq9(values: [u8; 9]) -> AnswerSet {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("phq9_{}", i + 1), *v))
        .collect()
}

fn insight_request(answers: AnswerSet) -> InsightRequest {
    InsightRequest {
        assessment_type: "phq9".into(),
        answers,
        prior_risk_level: RiskLevel::None,
        detected_conditions: Vec::new(),
        free_text: None,
        language: Language::En,
    }
}

fn chat_request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.into(),
        history: Vec::new(),
        prior_risk_level: RiskLevel::None,
        language: Language::En,
    }
}

fn model_reply(severity: &str) -> String {
    let mut draft = fallback_draft("phq9", 6, 27, severity, RiskLevel::None);
    draft.summary = "Generated summary".into();
    draft.summary_localized = "Ringkasan dijana".into();
    serde_json::to_string(&draft).unwrap()
}

// --- crisis gate ---

#[tokio::test]
async fn crisis_phrase_in_chat_makes_no_external_calls() {
    let harness = Harness::healthy(Behaviour::Reply("hello".into()));

    let reply = harness
        .orchestrator
        .chat(&chat_request("I want to kill myself"))
        .await
        .unwrap();

    assert_eq!(reply.source, ResponseSource::Crisis);
    assert!(reply.risk.is_crisis);
    assert_eq!(reply.risk.level, RiskLevel::Imminent);
    assert!(reply.chat_blocked);
    assert!(mentions_hotline(&reply.message));
    assert_eq!(harness.external_calls(), 0);
}

#[tokio::test]
async fn prior_high_risk_short_circuits_during_total_outage() {
    let harness = Harness::outage();

    let mut request = chat_request("Boleh kita berbual?");
    request.prior_risk_level = RiskLevel::High;
    request.language = Language::Ms;
    let reply = harness.orchestrator.chat(&request).await.unwrap();

    assert_eq!(reply.source, ResponseSource::Crisis);
    assert!(!reply.message.is_empty());
    assert!(reply.message.contains("Sila"));
    assert!(!reply.hotlines.is_empty());
    assert_eq!(harness.external_calls(), 0);

    let mut request = insight_request(phq9([0; 9]));
    request.prior_risk_level = RiskLevel::High;
    let report = harness.orchestrator.generate_insight(&request).await.unwrap();
    assert_eq!(report.source, ResponseSource::Crisis);
    assert_eq!(report.risk.level, RiskLevel::Imminent);
    assert!(report.safety.is_some_and(|s| !s.message.is_empty()));
    assert_eq!(harness.external_calls(), 0);
}

#[tokio::test]
async fn self_harm_item_short_circuits_insights() {
    let harness = Harness::healthy(Behaviour::Reply(model_reply("Mild")));

    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([1, 0, 0, 0, 0, 0, 0, 0, 2])))
        .await
        .unwrap();

    assert_eq!(report.source, ResponseSource::Crisis);
    assert!(report.risk.is_crisis);
    assert_eq!(report.score.score, 3);
    assert_eq!(harness.external_calls(), 0);
}

#[tokio::test]
async fn crisis_free_text_short_circuits_insights() {
    let harness = Harness::healthy(Behaviour::Reply(model_reply("Mild")));

    let mut request = insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0]));
    request.free_text = Some("sometimes I think about suicide".into());
    let report = harness.orchestrator.generate_insight(&request).await.unwrap();

    assert_eq!(report.source, ResponseSource::Crisis);
    assert_eq!(harness.external_calls(), 0);
}

// --- insights path ---

#[tokio::test]
async fn mild_assessment_generates_validated_insight() {
    let harness = Harness::healthy(Behaviour::Reply(model_reply("Mild")));

    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0])))
        .await
        .unwrap();

    assert_eq!(report.source, ResponseSource::Generated);
    assert_eq!(report.score.score, 6);
    assert_eq!(report.score.severity, "Mild");
    assert_eq!(report.insight.content.summary, "Generated summary");
    assert_eq!(report.insight.assessment_type, "phq9");
    assert_eq!(report.insight.severity, "Mild");
    assert_eq!(report.insight.score, 6);
    assert!(!report.risk.is_crisis);

    // depression + general, deduplicated and capped at top_k
    let categories = harness.retriever.categories.lock().unwrap().clone();
    assert_eq!(categories.len(), 2);
    assert!(categories.contains(&"depression".to_string()));
    assert!(categories.contains(&"general".to_string()));
    assert!(report.sources.len() <= PipelineConfig::default().top_k);
    assert!(
        report
            .sources
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity)
    );
}

#[tokio::test]
async fn severe_assessment_with_failing_model_uses_fallback() {
    let harness = Harness::healthy(Behaviour::Fail);

    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([3, 3, 3, 3, 3, 3, 3, 3, 0])))
        .await
        .unwrap();

    assert_eq!(report.source, ResponseSource::Fallback);
    assert_eq!(report.score.severity, "Severe");
    assert!(!report.insight.content.risk_factors.is_empty());
    assert!(
        report
            .insight
            .content
            .recommendations
            .iter()
            .any(|r| r.priority == Priority::High && mentions_hotline(&r.text))
    );
    assert_eq!(harness.generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn generation_timeout_falls_back() {
    let harness = Harness::healthy(Behaviour::Hang);

    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([2, 2, 2, 2, 2, 0, 0, 0, 0])))
        .await
        .unwrap();

    assert_eq!(report.source, ResponseSource::Fallback);
    assert_eq!(report.score.severity, "Moderate");
    assert!(!report.insight.content.risk_factors.is_empty());
}

#[tokio::test]
async fn malformed_model_output_falls_back() {
    let harness = Harness::healthy(Behaviour::Reply(
        "Sure! Here are some thoughts about your results.".into(),
    ));

    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0])))
        .await
        .unwrap();

    assert_eq!(report.source, ResponseSource::Fallback);
    assert!(report.usage.is_none());
}

#[tokio::test]
async fn model_output_violating_severe_contract_falls_back() {
    // Valid shape, but no hotline recommendation for a severe result.
    let harness = Harness::healthy(Behaviour::Reply(model_reply("Moderate")));

    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([3, 3, 3, 3, 3, 3, 3, 3, 0])))
        .await
        .unwrap();

    assert_eq!(report.source, ResponseSource::Fallback);
}

#[tokio::test]
async fn retrieval_outage_still_generates_with_sentinel_context() {
    let harness = Harness::new(
        FakeEmbedder::default(),
        FakeRetriever {
            fail: true,
            ..Default::default()
        },
        FakeGenerator::new(Behaviour::Reply(model_reply("Mild"))),
    );

    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0])))
        .await
        .unwrap();

    assert_eq!(report.source, ResponseSource::Generated);
    assert!(report.sources.is_empty());
    let prompts = harness.generator.system_prompts.lock().unwrap();
    assert!(prompts[0].contains(NO_CONTEXT));
}

#[tokio::test]
async fn embedding_outage_skips_retrieval() {
    let harness = Harness::new(
        FakeEmbedder {
            fail: true,
            ..Default::default()
        },
        FakeRetriever::default(),
        FakeGenerator::new(Behaviour::Reply(model_reply("Mild"))),
    );

    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0])))
        .await
        .unwrap();

    assert_eq!(report.source, ResponseSource::Generated);
    assert_eq!(harness.retriever.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn embedding_timeout_still_generates_with_sentinel_context() {
    let harness = Harness::new(
        FakeEmbedder {
            hang: true,
            ..Default::default()
        },
        FakeRetriever::default(),
        FakeGenerator::new(Behaviour::Reply(model_reply("Mild"))),
    );

    let started = Instant::now();
    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0])))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.source, ResponseSource::Generated);
    assert!(report.sources.is_empty());
    assert_eq!(harness.retriever.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.generator.calls.load(Ordering::SeqCst), 1);
    let prompts = harness.generator.system_prompts.lock().unwrap();
    assert!(prompts[0].contains(NO_CONTEXT));
}

#[tokio::test]
async fn retrieval_timeout_still_generates_with_sentinel_context() {
    let harness = Harness::new(
        FakeEmbedder::default(),
        FakeRetriever {
            hang: true,
            ..Default::default()
        },
        FakeGenerator::new(Behaviour::Reply(model_reply("Mild"))),
    );

    let started = Instant::now();
    let report = harness
        .orchestrator
        .generate_insight(&insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0])))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.source, ResponseSource::Generated);
    assert!(report.sources.is_empty());
    assert_eq!(harness.embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.generator.calls.load(Ordering::SeqCst), 1);
    let prompts = harness.generator.system_prompts.lock().unwrap();
    assert!(prompts[0].contains(NO_CONTEXT));
}

#[tokio::test]
async fn chat_retrieval_timeout_still_replies() {
    let harness = Harness::new(
        FakeEmbedder::default(),
        FakeRetriever {
            hang: true,
            ..Default::default()
        },
        FakeGenerator::new(Behaviour::Reply("Let's take it one step at a time.".into())),
    );

    let started = Instant::now();
    let reply = harness
        .orchestrator
        .chat(&chat_request("Work has been stressful"))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(reply.source, ResponseSource::Generated);
    assert!(reply.sources.is_empty());
    let prompts = harness.generator.system_prompts.lock().unwrap();
    assert!(prompts[0].contains(NO_CONTEXT));
}

#[tokio::test]
async fn high_risk_free_text_rejects_model_reply_without_hotline() {
    // "hurt myself" is high, not imminent, so the model still runs.
    let harness = Harness::healthy(Behaviour::Reply(model_reply("Mild")));

    let mut request = insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0]));
    request.free_text = Some("I keep wanting to hurt myself".into());
    let report = harness.orchestrator.generate_insight(&request).await.unwrap();

    assert_eq!(report.source, ResponseSource::Fallback);
    assert_eq!(report.risk.level, RiskLevel::High);
    assert_eq!(report.score.severity, "Mild");
    assert_eq!(harness.generator.calls.load(Ordering::SeqCst), 1);
    let prompts = harness.generator.system_prompts.lock().unwrap();
    assert!(prompts[0].contains("urgency \"immediate\""));
    let first_step = &report.insight.content.next_steps[0];
    assert!(mentions_hotline(&first_step.action));
}

#[tokio::test]
async fn high_risk_free_text_accepts_model_reply_with_hotline() {
    let mut draft = fallback_draft("phq9", 6, 27, "Mild", RiskLevel::High);
    draft.summary = "Generated summary".into();
    let harness = Harness::healthy(Behaviour::Reply(serde_json::to_string(&draft).unwrap()));

    let mut request = insight_request(phq9([1, 1, 1, 1, 1, 1, 0, 0, 0]));
    request.free_text = Some("I keep wanting to hurt myself".into());
    let report = harness.orchestrator.generate_insight(&request).await.unwrap();

    assert_eq!(report.source, ResponseSource::Generated);
    assert_eq!(report.insight.content.summary, "Generated summary");
    assert_eq!(report.risk.level, RiskLevel::High);
}

#[tokio::test]
async fn incomplete_answers_propagate() {
    let harness = Harness::healthy(Behaviour::Reply(model_reply("Mild")));
    let mut answers = phq9([1; 9]);
    answers.remove("phq9_4");

    let err = harness
        .orchestrator
        .generate_insight(&insight_request(answers))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InsightError::Scoring(ScoringError::IncompleteAnswers { .. })
    ));
    assert_eq!(harness.external_calls(), 0);
}

#[tokio::test]
async fn unknown_instrument_propagates() {
    let harness = Harness::healthy(Behaviour::Reply(model_reply("Mild")));
    let mut request = insight_request(phq9([0; 9]));
    request.assessment_type = "mmpi".into();

    let err = harness.orchestrator.generate_insight(&request).await.unwrap_err();
    assert!(matches!(
        err,
        InsightError::Scoring(ScoringError::UnknownInstrument(_))
    ));
}

// --- chat path ---

#[tokio::test]
async fn chat_passes_bounded_history() {
    let harness = Harness::healthy(Behaviour::Reply("That sounds hard.".into()));

    let mut request = chat_request("I had a rough week");
    request.history = (0..20)
        .map(|i| {
            if i % 2 == 0 {
                ChatMessage::user(format!("user {i}"))
            } else {
                ChatMessage::assistant(format!("assistant {i}"))
            }
        })
        .collect();
    let reply = harness.orchestrator.chat(&request).await.unwrap();

    assert_eq!(reply.source, ResponseSource::Generated);
    assert_eq!(reply.message, "That sounds hard.");
    assert!(!reply.chat_blocked);
    assert!(reply.hotlines.is_empty());

    let conversations = harness.generator.conversations.lock().unwrap();
    let sent = &conversations[0];
    // six prior turns of one user and one assistant message each
    assert_eq!(sent.len(), 13);
    assert_eq!(sent[0].content, "user 8");
    let last = sent.last().unwrap();
    assert_eq!(last.role, ChatRole::User);
    assert_eq!(last.content, "I had a rough week");
}

#[test]
fn history_keeps_last_user_turns() {
    let history = vec![
        ChatMessage::assistant("welcome"),
        ChatMessage::user("first"),
        ChatMessage::assistant("reply 1"),
        ChatMessage::assistant("reply 1, continued"),
        ChatMessage::user("second"),
        ChatMessage::user("second, again"),
        ChatMessage::assistant("reply 2"),
    ];

    let window = recent_turns(&history, 2);
    assert_eq!(window.len(), 3);
    assert_eq!(window[0].content, "second");

    let window = recent_turns(&history, 3);
    assert_eq!(window[0].content, "first");
    assert_eq!(window.len(), 6);

    // fewer turns than the window: keep everything from the first user message
    assert_eq!(recent_turns(&history, 6).len(), 6);
    assert!(recent_turns(&history, 0).is_empty());
    assert!(recent_turns(&[ChatMessage::assistant("hi")], 6).is_empty());
}

#[tokio::test]
async fn high_risk_chat_gets_reply_with_safety_addendum() {
    let harness = Harness::healthy(Behaviour::Reply("I'm here with you.".into()));

    let reply = harness
        .orchestrator
        .chat(&chat_request("I feel hopeless"))
        .await
        .unwrap();

    assert_eq!(reply.source, ResponseSource::Generated);
    assert_eq!(reply.risk.level, RiskLevel::High);
    assert!(reply.chat_blocked);
    assert!(reply.message.starts_with("I'm here with you."));
    assert!(mentions_hotline(&reply.message));
    assert!(!reply.hotlines.is_empty());
    let prompts = harness.generator.system_prompts.lock().unwrap();
    assert!(prompts[0].contains("03-7627 2929"));
}

#[tokio::test]
async fn chat_generation_failure_returns_fallback_reply() {
    let harness = Harness::healthy(Behaviour::Fail);

    let mut request = chat_request("Saya rasa murung hari ini");
    request.language = Language::Ms;
    let reply = harness.orchestrator.chat(&request).await.unwrap();

    assert_eq!(reply.source, ResponseSource::Fallback);
    assert_eq!(reply.risk.level, RiskLevel::Moderate);
    assert!(reply.message.starts_with("Maaf"));
    assert!(!reply.chat_blocked);
}

#[tokio::test]
async fn empty_chat_message_is_rejected() {
    let harness = Harness::healthy(Behaviour::Reply("unused".into()));
    let err = harness.orchestrator.chat(&chat_request("   ")).await.unwrap_err();
    assert!(matches!(err, InsightError::EmptyMessage));
    assert_eq!(harness.external_calls(), 0);
}
