//! Settings — the user's Gemini API key and base resume.
//!
//! Stored under the two keys `geminiApiKey` / `userResume`. The backend is
//! pluggable: `AppState` holds an `Arc<dyn SettingsStore>`, chosen at startup via config.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SettingsBackend;

pub mod file;
pub mod handlers;
pub mod memory;
pub mod redis_store;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;
pub use redis_store::RedisSettingsStore;

pub const API_KEY_KEY: &str = "geminiApiKey";
pub const USER_RESUME_KEY: &str = "userResume";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings are not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("settings store unavailable: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("{0}")]
    Invalid(String),
}

/// A complete, validated pair. The only shape the menu handler works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "geminiApiKey")]
    pub api_key: String,
    #[serde(rename = "userResume")]
    pub user_resume: String,
}

impl Settings {
    /// Trims both values and rejects the pair if either ends up empty.
    pub fn validated(api_key: &str, user_resume: &str) -> Result<Self, SettingsError> {
        let api_key = api_key.trim();
        let user_resume = user_resume.trim();
        if api_key.is_empty() || user_resume.is_empty() {
            return Err(SettingsError::Invalid(
                "Both API Key and Resume are required.".to_string(),
            ));
        }
        Ok(Self {
            api_key: api_key.to_string(),
            user_resume: user_resume.to_string(),
        })
    }
}

/// Whatever is currently persisted; either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(rename = "geminiApiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "userResume", default, skip_serializing_if = "Option::is_none")]
    pub user_resume: Option<String>,
}

impl StoredSettings {
    /// Both fields present and non-blank, or nothing.
    pub fn complete(&self) -> Option<Settings> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }
        match (present(&self.api_key), present(&self.user_resume)) {
            (Some(api_key), Some(user_resume)) => Some(Settings {
                api_key: api_key.to_string(),
                user_resume: user_resume.to_string(),
            }),
            _ => None,
        }
    }
}

impl From<Settings> for StoredSettings {
    fn from(settings: Settings) -> Self {
        Self {
            api_key: Some(settings.api_key),
            user_resume: Some(settings.user_resume),
        }
    }
}

/// Key/value persistence for the two settings fields.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<StoredSettings, SettingsError>;

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Opens the backend selected in config.
pub fn open_store(backend: &SettingsBackend) -> Result<Arc<dyn SettingsStore>> {
    Ok(match backend {
        SettingsBackend::File(path) => Arc::new(FileSettingsStore::new(path.clone())),
        SettingsBackend::Redis(url) => Arc::new(RedisSettingsStore::open(url)?),
    })
}
