pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};

use crate::analysis::extract::MAX_BODY_BYTES;
use crate::analysis::handlers;
use crate::models::catalog::{model_catalog, ModelCatalog};
use crate::settings;
use crate::state::AppState;

async fn models_handler() -> Json<ModelCatalog> {
    Json(model_catalog())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/llm/health", get(health::llm_health_handler))
        .route("/api/v1/models", get(models_handler))
        .route(
            "/api/v1/analyses",
            post(handlers::handle_analyze)
                .get(handlers::handle_list_analyses)
                .delete(handlers::handle_clear_analyses),
        )
        .route("/api/v1/analyses/:id", get(handlers::handle_get_analysis))
        .route(
            "/api/v1/analyses/:id/report",
            get(handlers::handle_export_report),
        )
        .route(
            "/api/v1/settings",
            get(settings::handle_get_settings).put(settings::handle_put_settings),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
