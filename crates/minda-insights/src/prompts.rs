//! System prompts and request text for the two model personas.

use minda_core::models::language::Language;
use minda_core::models::risk::RiskLevel;
use minda_core::models::score::{ScoreResult, SeverityTier};

use crate::hotlines::HOTLINES;

const CHAT_PERSONA: &str = "\
You are a supportive mental-health companion for users in Malaysia. \
You listen with warmth, reflect feelings back, and offer practical, evidence-based \
self-care ideas drawn from the knowledge context below. \
You are not a clinician: never diagnose, never prescribe or adjust medication, and \
encourage professional help when difficulties persist or worsen. \
Ground factual statements in the knowledge context; if it does not cover the question, \
say so rather than inventing information. Keep replies short and conversational.";

const INSIGHT_PERSONA: &str = "\
You are a mental-health psychoeducation writer. You explain screening questionnaire \
results to the person who completed them, with compassion and without alarm. \
A screening result is not a diagnosis; say so where it matters and never name a \
disorder as a conclusion. Base advice on the knowledge context below.";

/// JSON shape the insight model must produce. Every text field has a Malay
/// `*Localized` counterpart.
const INSIGHT_SHAPE: &str = r#"{
  "summary": "string",
  "summaryLocalized": "string",
  "keyFindings": [{"text": "string", "textLocalized": "string", "kind": "positive|concern|neutral"}],
  "recommendations": [{"text": "string", "textLocalized": "string", "priority": "high|medium|low"}],
  "copingStrategies": [{"title": "string", "titleLocalized": "string", "description": "string", "descriptionLocalized": "string"}],
  "riskFactors": [{"text": "string", "textLocalized": "string", "level": "low|moderate|high"}],
  "nextSteps": [{"action": "string", "actionLocalized": "string", "urgency": "immediate|soon|when_ready"}]
}"#;

fn hotline_lines() -> String {
    HOTLINES
        .iter()
        .map(|h| format!("- {}: {} ({})", h.name, h.number, h.hours))
        .collect::<Vec<_>>()
        .join("\n")
}

/// System prompt for the chat assistant.
///
/// `elevated_risk` adds an instruction to check on the user's safety and
/// share the hotline list.
pub fn chat_system_prompt(language: Language, context: &str, elevated_risk: bool) -> String {
    let mut prompt = format!(
        "{CHAT_PERSONA}\n\nReply in {}.\n\n{context}",
        language.name()
    );
    if elevated_risk {
        prompt.push_str(&format!(
            "\n\nThe user's latest message suggests they may be at risk. Gently ask about \
             their safety, acknowledge their pain, and include these support lines in your \
             reply:\n{}",
            hotline_lines()
        ));
    }
    prompt
}

/// System prompt for structured insight generation.
///
/// `risk` is the user's current risk level after the crisis gate.
pub fn insight_system_prompt(context: &str, tier: SeverityTier, risk: RiskLevel) -> String {
    let mut rules = vec![
        "Respond with ONLY a single JSON object matching the shape below. No markdown code \
         fences, no commentary before or after the object."
            .to_string(),
        "Write every English field in clear plain English and its *Localized pair in \
         Bahasa Melayu. Never leave a localized field empty."
            .to_string(),
        "Include at least two keyFindings, three recommendations, two copingStrategies and \
         two nextSteps."
            .to_string(),
    ];
    if tier.requires_risk_factors() {
        rules.push("riskFactors must contain at least one entry.".to_string());
    }
    if tier.is_severe() {
        rules.push(format!(
            "recommendations must include a priority \"high\" item urging the user to \
             contact a crisis hotline, naming at least one of:\n{}",
            hotline_lines()
        ));
    }
    if risk.is_crisis() {
        rules.push(format!(
            "The user has recently expressed thoughts of harming themselves. Include a \
             nextSteps item with urgency \"immediate\" that names at least one of these \
             support lines:\n{}",
            hotline_lines()
        ));
    }

    let rules = rules
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {r}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{INSIGHT_PERSONA}\n\nRules:\n{rules}\n\nJSON shape:\n{INSIGHT_SHAPE}\n\n{context}")
}

/// The user turn for insight generation.
pub fn insight_user_message(
    instrument_name: &str,
    result: &ScoreResult,
    detected_conditions: &[String],
    answers_summary: &str,
) -> String {
    let mut message = format!(
        "Assessment: {instrument_name}\nScore: {} of {}\nSeverity: {} ({})\n",
        result.score, result.max_score, result.severity, result.severity_localized
    );
    if !detected_conditions.is_empty() {
        message.push_str(&format!(
            "Notable responses: {}\n",
            detected_conditions.join("; ")
        ));
    }
    message.push('\n');
    message.push_str(answers_summary);
    message.push_str("\nExplain these results and suggest supportive next steps.");
    message
}

/// Retrieval query text for the insights path: the instrument's topic,
/// the severity label and any notable responses.
pub fn insight_query(topic: &str, severity: &str, detected_conditions: &[String]) -> String {
    let mut query = format!("{topic} {severity}");
    for condition in detected_conditions {
        query.push(' ');
        query.push_str(condition);
    }
    query
}
