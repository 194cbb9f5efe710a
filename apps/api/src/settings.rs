//! Flat-file settings cache: the recruiter-entered API key and job profile,
//! persisted as one JSON file so they survive service restarts.
//!
//! A missing or corrupt file degrades to defaults; a failed write is logged
//! and the in-memory copy still updates, so the request that carried the
//! change is not lost.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::models::JobProfile;
use crate::state::AppState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub job_profile: JobProfile,
}

pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Opens the store at `path`, loading any existing settings file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load_settings(&path);
        Self {
            path,
            current: RwLock::new(current),
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.current.read().expect("settings lock poisoned").clone()
    }

    /// Replaces the settings and writes them through to disk.
    pub fn update(&self, settings: Settings) {
        if let Err(e) = persist_settings(&self.path, &settings) {
            warn!(path = %self.path.display(), "failed to persist settings: {e}");
        }
        *self.current.write().expect("settings lock poisoned") = settings;
    }
}

fn load_settings(path: &Path) -> Settings {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Settings::default(),
    };
    match serde_json::from_str(&raw) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(path = %path.display(), "settings file is corrupt, using defaults: {e}");
            Settings::default()
        }
    }
}

fn persist_settings(path: &Path, settings: &Settings) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)
}

/// Masks an API key for display: enough to recognize, not enough to reuse.
pub fn mask_api_key(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(8);
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub has_api_key: bool,
    pub api_key_masked: String,
    pub job_profile: JobProfile,
}

impl From<Settings> for SettingsView {
    fn from(settings: Settings) -> Self {
        Self {
            has_api_key: !settings.api_key.trim().is_empty(),
            api_key_masked: mask_api_key(&settings.api_key),
            job_profile: settings.job_profile,
        }
    }
}

/// Partial update: omitted fields keep their stored values; an explicit
/// empty string clears the API key.
#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    pub api_key: Option<String>,
    pub job_profile: Option<JobProfile>,
}

/// GET /api/v1/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<SettingsView> {
    Json(state.settings.snapshot().into())
}

/// PUT /api/v1/settings
pub async fn handle_put_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>, AppError> {
    let mut settings = state.settings.snapshot();
    if let Some(api_key) = update.api_key {
        settings.api_key = api_key.trim().to_string();
    }
    if let Some(job_profile) = update.job_profile {
        settings.job_profile = job_profile;
    }
    state.settings.update(settings.clone());
    Ok(Json(settings.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.json"));
        assert_eq!(store.snapshot(), Settings::default());
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::open(&path);
        store.update(Settings {
            api_key: "sk-or-v1-abcdef".to_string(),
            job_profile: JobProfile {
                job_title: "Backend Engineer".to_string(),
                ..JobProfile::default()
            },
        });

        // A fresh store sees what the first one wrote.
        let reopened = SettingsStore::open(&path);
        let settings = reopened.snapshot();
        assert_eq!(settings.api_key, "sk-or-v1-abcdef");
        assert_eq!(settings.job_profile.job_title, "Backend Engineer");
    }

    #[test]
    fn test_corrupt_file_degrades_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let store = SettingsStore::open(&path);
        assert_eq!(store.snapshot(), Settings::default());
    }

    #[test]
    fn test_unwritable_path_still_updates_memory() {
        let store = SettingsStore::open("/nonexistent-dir/settings.json");
        store.update(Settings {
            api_key: "key".to_string(),
            job_profile: JobProfile::default(),
        });
        assert_eq!(store.snapshot().api_key, "key");
    }

    #[test]
    fn test_mask_api_key_hides_the_middle() {
        assert_eq!(mask_api_key(""), "");
        assert_eq!(mask_api_key("short"), "********");
        let masked = mask_api_key("sk-or-v1-0123456789abcdef");
        assert!(masked.starts_with("sk-o"));
        assert!(masked.ends_with("cdef"));
        assert!(!masked.contains("0123456789"));
    }

    #[test]
    fn test_settings_view_flags_presence_without_leaking() {
        let view: SettingsView = Settings {
            api_key: "sk-or-v1-0123456789abcdef".to_string(),
            job_profile: JobProfile::default(),
        }
        .into();
        assert!(view.has_api_key);
        assert_ne!(view.api_key_masked, "sk-or-v1-0123456789abcdef");
    }
}
