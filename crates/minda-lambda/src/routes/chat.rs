use axum::Json;
use axum::extract::State;

use minda_insights::orchestrator::{ChatReply, ChatRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let reply = state.orchestrator.chat(&request).await?;
    Ok(Json(reply))
}
