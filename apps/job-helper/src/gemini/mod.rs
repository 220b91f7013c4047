/// Gemini client — the single point of entry for all generative-language API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All generation requests MUST go through this module.
///
/// One attempt per call: no retries, no backoff, no timeout beyond the transport's own.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

pub mod prompts;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// Verify availability in Google AI Studio before changing.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";
const FINISH_REASON_STOP: &str = "STOP";

#[derive(Debug, Error)]
pub enum GeminiError {
    /// Transport failure (`status: None`) or a non-2xx response.
    #[error("API request failed{}: {message}", status_suffix(.status))]
    RequestFailed { status: Option<u16>, message: String },

    #[error("AI prompt blocked for reason: {reason}")]
    PromptBlocked { reason: String },

    #[error("AI generation interrupted: {reason}")]
    GenerationInterrupted { reason: String },

    #[error("Unable to extract valid content from Gemini response.")]
    MalformedResponse,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        let err = err.without_url();
        GeminiError::RequestFailed {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Produces generated text for a prompt. Implemented by `GeminiClient`;
/// the menu handler only sees this trait.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GeminiError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Part {
    /// Kept as a raw value: a non-string `text` must not fail the whole decode.
    pub text: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SafetyRating {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub probability: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Classifies a decoded response body.
///
/// Order matters: generated text wins over feedback, a block reason wins over a
/// finish reason, and anything else is malformed.
pub fn extract_text(response: &GenerateContentResponse) -> Result<String, GeminiError> {
    let first = response.candidates.first();

    if let Some(text) = first
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .and_then(|p| p.text.as_ref())
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }

    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            error!(
                "Prompt blocked: {}. Safety ratings: {}",
                reason,
                format_safety_ratings(&feedback.safety_ratings)
            );
            return Err(GeminiError::PromptBlocked {
                reason: reason.clone(),
            });
        }
    }

    if let Some(reason) = first.and_then(|c| c.finish_reason.as_deref()) {
        if reason != FINISH_REASON_STOP {
            error!("Generation halted: {reason}");
            return Err(GeminiError::GenerationInterrupted {
                reason: reason.to_string(),
            });
        }
    }

    error!("Unexpected API response format: {response:?}");
    Err(GeminiError::MalformedResponse)
}

fn format_safety_ratings(ratings: &[SafetyRating]) -> String {
    if ratings.is_empty() {
        return "N/A".to_string();
    }
    ratings
        .iter()
        .map(|r| format!("{}({})", r.category, r.probability))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pulls the most useful message out of a non-2xx body.
fn error_message(body: &str, reason_phrase: Option<&str>) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .or_else(|| reason_phrase.map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Wraps the Gemini `generateContent` endpoint. Cheap to clone.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into().trim().to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GeminiError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                let err = GeminiError::from(e);
                error!("Error invoking Gemini API: {err}");
                err
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Gemini API returned an error ({}): {}", status, body);
            return Err(GeminiError::RequestFailed {
                status: Some(status.as_u16()),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Gemini response is not valid JSON: {e}");
            GeminiError::MalformedResponse
        })?;

        let text = extract_text(&parsed)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, candidate_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(text)
    }
}
