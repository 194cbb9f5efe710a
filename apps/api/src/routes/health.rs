use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::analysis::scorer::resolve_api_key;
use crate::llm_client::{HealthReport, DEFAULT_MODEL};
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "talentsift-api"
    }))
}

/// GET /api/v1/llm/health
/// Probes the OpenRouter API with a minimal completion.
pub async fn llm_health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    let settings = state.settings.snapshot();
    let api_key = resolve_api_key(
        None,
        &settings.api_key,
        state.config.openrouter_api_key.as_deref(),
    );
    Json(state.llm.health_check(DEFAULT_MODEL, api_key).await)
}
