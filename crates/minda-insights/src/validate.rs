//! Validation boundary between raw model output and [`InsightDraft`].
//!
//! Model text is parsed into an untyped candidate, checked for the required
//! keys, deserialized, then held to the same contract the fallback
//! generator satisfies. Only a draft that passes every step is used.

use serde_json::Value;

use minda_core::models::insight::{InsightDraft, Priority};
use minda_core::models::risk::RiskLevel;
use minda_core::models::score::SeverityTier;

use crate::error::StageError;
use crate::hotlines::mentions_hotline;

const REQUIRED_KEYS: &[&str] = &[
    "summary",
    "summaryLocalized",
    "keyFindings",
    "recommendations",
    "copingStrategies",
    "riskFactors",
    "nextSteps",
];

/// The outermost `{...}` span of `text`, if any.
///
/// Tolerates code fences and prose around the object; anything not
/// enclosed by the first `{` and last `}` is ignored.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse and validate model output for an assessment at `tier` from a user
/// currently at `risk`.
pub fn parse_insight(
    text: &str,
    tier: SeverityTier,
    risk: RiskLevel,
) -> Result<InsightDraft, StageError> {
    let json = extract_json(text)
        .ok_or_else(|| StageError::SchemaValidation("no JSON object in model output".to_string()))?;

    let candidate: Value = serde_json::from_str(json)
        .map_err(|e| StageError::SchemaValidation(format!("invalid JSON: {e}")))?;

    let object = candidate
        .as_object()
        .ok_or_else(|| StageError::SchemaValidation("top level is not an object".to_string()))?;
    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|k| !object.contains_key(*k))
        .collect();
    if !missing.is_empty() {
        return Err(StageError::SchemaValidation(format!(
            "missing keys: {}",
            missing.join(", ")
        )));
    }

    let draft: InsightDraft = serde_json::from_value(candidate)
        .map_err(|e| StageError::SchemaValidation(e.to_string()))?;

    check_contract(&draft, tier, risk).map_err(StageError::SchemaValidation)?;
    Ok(draft)
}

/// Check the insight contract: every text pair filled on both sides, risk
/// factors from moderate upwards, a high-priority hotline recommendation
/// when severe, and a hotline in a recommendation or next step whenever the
/// user's risk level is a crisis level.
pub fn check_contract(
    draft: &InsightDraft,
    tier: SeverityTier,
    risk: RiskLevel,
) -> Result<(), String> {
    for (field, en, ms) in draft.text_pairs() {
        if en.trim().is_empty() {
            return Err(format!("{field} is empty"));
        }
        if ms.trim().is_empty() {
            return Err(format!("{field} has no localized text"));
        }
    }

    if draft.recommendations.is_empty() {
        return Err("no recommendations".to_string());
    }

    if tier.requires_risk_factors() && draft.risk_factors.is_empty() {
        return Err(format!("riskFactors empty at {tier:?} severity"));
    }

    if tier.is_severe()
        && !draft.recommendations.iter().any(|r| {
            r.priority == Priority::High
                && (mentions_hotline(&r.text) || mentions_hotline(&r.text_localized))
        })
    {
        return Err("severe result without a high-priority hotline recommendation".to_string());
    }

    if risk.is_crisis() {
        let recommended = draft
            .recommendations
            .iter()
            .any(|r| mentions_hotline(&r.text) || mentions_hotline(&r.text_localized));
        let stepped = draft
            .next_steps
            .iter()
            .any(|n| mentions_hotline(&n.action) || mentions_hotline(&n.action_localized));
        if !recommended && !stepped {
            return Err(format!("no hotline for a user at {risk} risk"));
        }
    }

    Ok(())
}
