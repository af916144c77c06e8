use axum::Json;
use axum::extract::State;

use minda_insights::orchestrator::{InsightReport, InsightRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn generate_insight(
    State(state): State<AppState>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<InsightReport>, ApiError> {
    let report = state.orchestrator.generate_insight(&request).await?;
    Ok(Json(report))
}
