use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Where the user's settings are persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsBackend {
    File(PathBuf),
    Redis(String),
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub settings_backend: SettingsBackend,
    pub options_page_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let settings_backend = match lookup("SETTINGS_BACKEND").as_deref() {
            None | Some("file") => SettingsBackend::File(PathBuf::from(
                lookup("SETTINGS_PATH").unwrap_or_else(|| "job-helper-settings.json".to_string()),
            )),
            Some("redis") => SettingsBackend::Redis(lookup("REDIS_URL").context(
                "Required environment variable 'REDIS_URL' is not set (SETTINGS_BACKEND=redis)",
            )?),
            Some(other) => bail!("SETTINGS_BACKEND must be 'file' or 'redis', got '{other}'"),
        };

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            gemini_api_base: lookup("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            gemini_model: lookup("GEMINI_MODEL")
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            settings_backend,
            options_page_url: lookup("OPTIONS_PAGE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}/api/v1/settings")),
        })
    }
}
