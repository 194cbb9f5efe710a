use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// `OPENROUTER_API_KEY` is optional: without it the service runs in
/// free-model mode and sends no `Authorization` header. A key entered
/// through the settings endpoint takes precedence either way.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openrouter_api_key: Option<String>,
    pub settings_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let openrouter_api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            openrouter_api_key,
            settings_path: std::env::var("SETTINGS_PATH")
                .unwrap_or_else(|_| ".talentsift_settings.json".to_string())
                .into(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
