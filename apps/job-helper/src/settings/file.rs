use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{Settings, SettingsError, SettingsStore, StoredSettings};

/// Settings kept as one JSON object on local disk.
/// A missing file reads as "nothing configured yet".
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Temp file in the target directory, fsync, then rename over the target.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), SettingsError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<StoredSettings, SettingsError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}", self.path.display());
                Ok(StoredSettings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let contents = serde_json::to_vec_pretty(settings)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &contents))
            .await
            .map_err(std::io::Error::other)??;
        debug!("Settings written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().await.unwrap(), StoredSettings::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested").join("settings.json"));
        let settings = Settings::validated("key", "resume text").unwrap();

        store.save(&settings).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.complete(), Some(settings));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_save_replaces_existing_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"geminiApiKey": "old"}"#).unwrap();
        let store = FileSettingsStore::new(path.clone());

        store
            .save(&Settings::validated("new", "resume").unwrap())
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("new"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_partial_file_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"geminiApiKey": "key"}"#).unwrap();

        let loaded = FileSettingsStore::new(path).load().await.unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("key"));
        assert!(loaded.complete().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileSettingsStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, SettingsError::Serde(_)));
    }
}
