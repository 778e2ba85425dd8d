use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub gemini_configured: bool,
    pub spoonacular_configured: bool,
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state.db.health_check().await;
    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        database,
        gemini_configured: state.assistant.is_some(),
        spoonacular_configured: state.recipe_source.is_some(),
    })
}
