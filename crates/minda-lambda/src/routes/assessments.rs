use axum::Json;
use serde::{Deserialize, Serialize};

use minda_core::models::risk::RiskLevel;
use minda_core::models::score::ScoreResult;
use minda_instruments::error::ScoringError;
use minda_instruments::get_instrument;
use minda_instruments::scoring::AnswerSet;

use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    assessment_type: String,
    answers: AnswerSet,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    #[serde(flatten)]
    result: ScoreResult,
    /// Risk signalled by the instrument's self-harm item, if it has one.
    item_risk: RiskLevel,
    elevated_items: Vec<String>,
}

pub async fn score_assessment(
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let instrument = get_instrument(&request.assessment_type)
        .ok_or_else(|| ScoringError::UnknownInstrument(request.assessment_type.clone()))?;
    let result = instrument.score(&request.answers)?;

    Ok(Json(ScoreResponse {
        result,
        item_risk: instrument.item_risk(&request.answers),
        elevated_items: instrument
            .elevated_items(&request.answers)
            .into_iter()
            .map(|q| q.id.clone())
            .collect(),
    }))
}
