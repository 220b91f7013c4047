use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::info;

use super::{Settings, SettingsError, SettingsStore, StoredSettings, API_KEY_KEY, USER_RESUME_KEY};

/// Settings kept as two plain string keys in Redis.
pub struct RedisSettingsStore {
    client: redis::Client,
}

impl RedisSettingsStore {
    /// Validates the URL only; the connection is made per call.
    pub fn open(url: &str) -> Result<Self, SettingsError> {
        let client = redis::Client::open(url)?;
        info!("Redis settings store initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl SettingsStore for RedisSettingsStore {
    async fn load(&self) -> Result<StoredSettings, SettingsError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let (api_key, user_resume): (Option<String>, Option<String>) =
            conn.mget(&[API_KEY_KEY, USER_RESUME_KEY]).await?;
        Ok(StoredSettings {
            api_key,
            user_resume,
        })
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.mset::<_, _, ()>(&[
            (API_KEY_KEY, settings.api_key.as_str()),
            (USER_RESUME_KEY, settings.user_resume.as_str()),
        ])
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_bad_url() {
        assert!(matches!(
            RedisSettingsStore::open("not a redis url"),
            Err(SettingsError::Redis(_))
        ));
    }

    #[test]
    fn test_open_accepts_url_without_connecting() {
        assert!(RedisSettingsStore::open("redis://127.0.0.1:6379/").is_ok());
    }
}
