use std::sync::Mutex;

use async_trait::async_trait;

use super::{Settings, SettingsError, SettingsStore, StoredSettings};

/// Process-local settings. Nothing survives a restart.
#[derive(Default)]
pub struct MemorySettingsStore {
    inner: Mutex<StoredSettings>,
}

impl MemorySettingsStore {
    pub fn new(stored: StoredSettings) -> Self {
        Self {
            inner: Mutex::new(stored),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<StoredSettings, SettingsError> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = settings.clone().into();
        Ok(())
    }
}
