use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gemini::GeminiError;
use crate::settings::SettingsError;

/// Everything that can stop a menu activation. Each kind surfaces to the popup
/// as one human-readable message inside `SHOW_RESULTS_ERROR`.
#[derive(Debug, Error)]
pub enum HelperError {
    #[error("empty selection")]
    EmptySelection,

    #[error("settings unavailable: {0}")]
    SettingsUnavailable(String),

    #[error("API key or resume missing")]
    SettingsMissing,

    #[error(transparent)]
    Generation(#[from] GeminiError),
}

impl HelperError {
    pub fn user_message(&self) -> String {
        match self {
            HelperError::EmptySelection => {
                "No text was selected. Please highlight a job description and try again."
                    .to_string()
            }
            HelperError::SettingsUnavailable(_) => {
                "Unable to access settings. Please check your configuration.".to_string()
            }
            HelperError::SettingsMissing => {
                "API key or resume not configured. Opening settings now.".to_string()
            }
            HelperError::Generation(e) => format!("An error occurred: {e}"),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Settings(SettingsError::Invalid(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Settings(e) => {
                tracing::error!("Settings error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SETTINGS_ERROR",
                    "Unable to access settings".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
