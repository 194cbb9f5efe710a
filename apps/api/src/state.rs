use std::sync::Arc;

use crate::analysis::scorer::ResumeScorer;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::session::SessionStore;
use crate::settings::SettingsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: LlmClient,
    /// Pluggable scorer. Default: `OpenRouterScorer`; tests swap in stubs.
    pub scorer: Arc<dyn ResumeScorer>,
    pub sessions: SessionStore,
    pub settings: Arc<SettingsStore>,
}
