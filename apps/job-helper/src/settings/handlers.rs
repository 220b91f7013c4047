//! Axum route handlers for the settings surface.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::settings::{Settings, SettingsStore};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveSettingsRequest {
    #[serde(rename = "geminiApiKey", default)]
    pub api_key: String,
    #[serde(rename = "userResume", default)]
    pub user_resume: String,
}

/// The key itself is never sent back.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub has_api_key: bool,
    #[serde(rename = "userResume")]
    pub user_resume: Option<String>,
}

/// GET /api/v1/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, AppError> {
    let stored = state.settings.load().await?;
    Ok(Json(SettingsResponse {
        has_api_key: stored
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty()),
        user_resume: stored.user_resume,
    }))
}

/// PUT /api/v1/settings
///
/// Both fields are trimmed and required; nothing is written otherwise.
pub async fn handle_save_settings(
    State(state): State<AppState>,
    Json(request): Json<SaveSettingsRequest>,
) -> Result<StatusCode, AppError> {
    let settings = Settings::validated(&request.api_key, &request.user_resume)?;
    state.settings.save(&settings).await?;
    info!("Settings saved");
    Ok(StatusCode::NO_CONTENT)
}
