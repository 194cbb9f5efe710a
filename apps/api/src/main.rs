mod analysis;
mod config;
mod errors;
mod llm_client;
mod models;
mod report;
mod routes;
mod session;
mod settings;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::scorer::OpenRouterScorer;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::settings::SettingsStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentSift API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new();
    if config.openrouter_api_key.is_some() {
        info!("OpenRouter API key loaded from environment");
    } else {
        info!("No OPENROUTER_API_KEY set; running in free-model mode");
    }

    let settings = Arc::new(SettingsStore::open(&config.settings_path));
    info!("Settings store at {}", config.settings_path.display());

    let state = AppState {
        config: config.clone(),
        llm: llm.clone(),
        scorer: Arc::new(OpenRouterScorer::new(llm)),
        sessions: SessionStore::new(),
        settings,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
