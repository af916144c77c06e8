use axum::Json;
use axum::extract::Path;
use serde::Serialize;

use minda_instruments::scoring::{Question, ScaleOption, ScoringRange};
use minda_instruments::{all_instruments, get_instrument};

use crate::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSummary {
    id: String,
    name: String,
    topic: String,
    max_score: u32,
    is_premium_gate: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentDetail {
    id: String,
    name: String,
    topic: String,
    max_score: u32,
    is_premium_gate: bool,
    questions: Vec<Question>,
    scale_options: Vec<ScaleOption>,
    scoring_ranges: Vec<ScoringRange>,
}

pub async fn list_instruments() -> Json<Vec<InstrumentSummary>> {
    let instruments: Vec<InstrumentSummary> = all_instruments()
        .iter()
        .map(|i| InstrumentSummary {
            id: i.id().to_string(),
            name: i.name().to_string(),
            topic: i.topic().to_string(),
            max_score: i.max_score(),
            is_premium_gate: i.is_premium_gate(),
        })
        .collect();
    Json(instruments)
}

pub async fn get_instrument_detail(
    Path(id): Path<String>,
) -> Result<Json<InstrumentDetail>, ApiError> {
    let instrument = get_instrument(&id)
        .ok_or_else(|| ApiError::NotFound(format!("instrument not found: {id}")))?;

    Ok(Json(InstrumentDetail {
        id: instrument.id().to_string(),
        name: instrument.name().to_string(),
        topic: instrument.topic().to_string(),
        max_score: instrument.max_score(),
        is_premium_gate: instrument.is_premium_gate(),
        questions: instrument.questions().to_vec(),
        scale_options: instrument.scale().to_vec(),
        scoring_ranges: instrument.scoring_ranges().to_vec(),
    }))
}
