use axum::Json;
use serde::{Deserialize, Serialize};

use minda_core::models::language::Language;
use minda_core::models::risk::{RiskAssessment, RiskLevel};
use minda_insights::crisis;
use minda_insights::hotlines::{SafetyResponse, safety_response};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    prior_risk_level: RiskLevel,
    #[serde(default)]
    language: Language,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResponse {
    risk: RiskAssessment,
    /// Whether further interaction should be disabled.
    chat_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety: Option<SafetyResponse>,
}

/// Run the crisis gate alone. Pure and synchronous; no external calls.
pub async fn triage(Json(request): Json<TriageRequest>) -> Json<TriageResponse> {
    let decision = crisis::gate(request.prior_risk_level, request.text.as_deref());
    Json(TriageResponse {
        risk: decision.assessment,
        chat_blocked: decision.assessment.is_crisis,
        safety: decision
            .short_circuit
            .then(|| safety_response(request.language)),
    })
}
