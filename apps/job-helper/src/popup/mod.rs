//! Popup — turns whatever state object arrives into one of four views.
//!
//! `render` takes raw JSON rather than `ApplicationState`: the popup may be talking
//! to an older or newer background and must never fail on an unexpected shape.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::background::store::ApplicationState;

pub mod client;

pub const INITIALIZING_MESSAGE: &str = "Initializing...";
pub const DEFAULT_INITIAL_MESSAGE: &str = "Right-click selected job description to start.";
pub const DEFAULT_LOADING_MESSAGE: &str = "Processing... Please wait.";
pub const DEFAULT_ERROR_MESSAGE: &str = "An unspecified error occurred.";
pub const EMPTY_RESULTS_MESSAGE: &str = "Received results but no data.";
pub const UNKNOWN_STATE_MESSAGE: &str = "Unexpected state. Check console.";
pub const DISCONNECTED_MESSAGE: &str =
    "Could not connect to background. Ensure extension is enabled.";
pub const NO_RESPONSE_MESSAGE: &str = "Ready. Right-click a job description.";

/// One copyable text area in the results panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopyBlock {
    pub target: &'static str,
    pub label: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PopupView {
    Prompt { message: String },
    Loading { message: String },
    Error { message: String },
    Results { blocks: [CopyBlock; 2] },
}

impl PopupView {
    fn results(tailored_resume: String, cover_letter: String) -> Self {
        PopupView::Results {
            blocks: [
                CopyBlock {
                    target: "tailoredResume",
                    label: "Tailored Resume",
                    text: tailored_resume,
                },
                CopyBlock {
                    target: "coverLetter",
                    label: "Cover Letter",
                    text: cover_letter,
                },
            ],
        }
    }

    /// Plain-text rendering for a terminal.
    pub fn to_text(&self) -> String {
        match self {
            PopupView::Prompt { message } => message.clone(),
            PopupView::Loading { message } => format!("⏳ {message}"),
            PopupView::Error { message } => format!("Error: {message}"),
            PopupView::Results { blocks } => blocks
                .iter()
                .map(|b| format!("===== {} =====\n{}\n", b.label, b.text))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Total over every input, including `null` and objects that are not states at all.
pub fn render(state: &Value) -> PopupView {
    if state.is_null() {
        return PopupView::Prompt {
            message: INITIALIZING_MESSAGE.to_string(),
        };
    }

    if let Ok(typed) = serde_json::from_value::<ApplicationState>(state.clone()) {
        return match typed {
            ApplicationState::Initial { message } => PopupView::Prompt {
                message: or_default(message, DEFAULT_INITIAL_MESSAGE),
            },
            ApplicationState::Loading { message } => PopupView::Loading {
                message: or_default(message, DEFAULT_LOADING_MESSAGE),
            },
            ApplicationState::ResultsError { message } => PopupView::Error {
                message: or_default(message, DEFAULT_ERROR_MESSAGE),
            },
            ApplicationState::Results { payload } => {
                PopupView::results(payload.tailored_resume, payload.cover_letter)
            }
        };
    }

    // Known tag, incomplete body: fall back per view.
    let message = state
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    match state.get("type").and_then(Value::as_str) {
        Some("INITIAL") => PopupView::Prompt {
            message: message.unwrap_or_else(|| DEFAULT_INITIAL_MESSAGE.to_string()),
        },
        Some("SHOW_LOADING") => PopupView::Loading {
            message: message.unwrap_or_else(|| DEFAULT_LOADING_MESSAGE.to_string()),
        },
        Some("SHOW_RESULTS_ERROR") => PopupView::Error {
            message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        },
        Some("SHOW_RESULTS") => match state.get("payload").filter(|p| p.is_object()) {
            Some(payload) => {
                let field = |name: &str| {
                    payload
                        .get(name)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                PopupView::results(field("tailoredResume"), field("coverLetter"))
            }
            None => PopupView::Error {
                message: EMPTY_RESULTS_MESSAGE.to_string(),
            },
        },
        other => {
            warn!("Popup received unknown state type: {other:?} {state}");
            PopupView::Error {
                message: UNKNOWN_STATE_MESSAGE.to_string(),
            }
        }
    }
}

fn or_default(message: String, default: &str) -> String {
    if message.is_empty() {
        default.to_string()
    } else {
        message
    }
}

/// What the popup shows after asking the background for the current state.
///
/// A failed request means the background is unreachable; a missing answer
/// falls back to a generic initial state.
pub fn resolve_pulled_state<E: Display>(reply: Result<Option<Value>, E>) -> Value {
    match reply {
        Ok(Some(state)) => state,
        Ok(None) => {
            warn!("No response for GET_LAST_KNOWN_STATE");
            json!({"type": "INITIAL", "message": NO_RESPONSE_MESSAGE})
        }
        Err(e) => {
            error!("Error getting last state: {e}");
            json!({"type": "SHOW_RESULTS_ERROR", "message": DISCONNECTED_MESSAGE})
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_each_variant() {
        assert_eq!(
            render(&serde_json::to_value(ApplicationState::default()).unwrap()),
            PopupView::Prompt {
                message: crate::background::store::INITIAL_MESSAGE.to_string()
            }
        );
        assert_eq!(
            render(&serde_json::to_value(ApplicationState::loading()).unwrap()),
            PopupView::Loading {
                message: crate::background::store::LOADING_MESSAGE.to_string()
            }
        );
        assert_eq!(
            render(&serde_json::to_value(ApplicationState::error("bad")).unwrap()),
            PopupView::Error {
                message: "bad".to_string()
            }
        );
    }

    #[test]
    fn test_results_expose_two_copy_blocks() {
        let state = ApplicationState::results("resume".to_string(), "letter".to_string());
        match render(&serde_json::to_value(state).unwrap()) {
            PopupView::Results { blocks } => {
                assert_eq!(blocks[0].target, "tailoredResume");
                assert_eq!(blocks[0].text, "resume");
                assert_eq!(blocks[1].target, "coverLetter");
                assert_eq!(blocks[1].text, "letter");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_inputs_render_without_panicking() {
        let cases = [
            json!({"type": "SOMETHING_NEW"}),
            json!({"hello": "world"}),
            json!(42),
            json!("SHOW_RESULTS"),
            json!([1, 2, 3]),
            json!({"type": 7}),
        ];
        for case in cases {
            assert_eq!(
                render(&case),
                PopupView::Error {
                    message: UNKNOWN_STATE_MESSAGE.to_string()
                },
                "input: {case}"
            );
        }
    }

    #[test]
    fn test_null_state_is_initializing() {
        assert_eq!(
            render(&Value::Null),
            PopupView::Prompt {
                message: INITIALIZING_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_known_types_with_missing_fields_use_defaults() {
        assert_eq!(
            render(&json!({"type": "SHOW_LOADING"})),
            PopupView::Loading {
                message: DEFAULT_LOADING_MESSAGE.to_string()
            }
        );
        assert_eq!(
            render(&json!({"type": "SHOW_RESULTS_ERROR", "message": ""})),
            PopupView::Error {
                message: DEFAULT_ERROR_MESSAGE.to_string()
            }
        );
        assert_eq!(
            render(&json!({"type": "INITIAL"})),
            PopupView::Prompt {
                message: DEFAULT_INITIAL_MESSAGE.to_string()
            }
        );
        assert_eq!(
            render(&json!({"type": "SHOW_RESULTS"})),
            PopupView::Error {
                message: EMPTY_RESULTS_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_partial_payload_still_shows_results() {
        match render(&json!({"type": "SHOW_RESULTS", "payload": {"tailoredResume": "r"}})) {
            PopupView::Results { blocks } => {
                assert_eq!(blocks[0].text, "r");
                assert_eq!(blocks[1].text, "");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_pulled_state() {
        let state = json!({"type": "SHOW_LOADING", "message": "x"});
        assert_eq!(resolve_pulled_state::<String>(Ok(Some(state.clone()))), state);

        let none = resolve_pulled_state::<String>(Ok(None));
        assert_eq!(none["type"], "INITIAL");
        assert_eq!(none["message"], NO_RESPONSE_MESSAGE);

        let err = resolve_pulled_state(Err("connection refused"));
        assert_eq!(
            render(&err),
            PopupView::Error {
                message: DISCONNECTED_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_to_text_lists_both_blocks() {
        let text = PopupView::results("R".to_string(), "C".to_string()).to_text();
        assert!(text.contains("===== Tailored Resume =====\nR"));
        assert!(text.contains("===== Cover Letter =====\nC"));
        assert_eq!(
            PopupView::Error {
                message: "m".to_string()
            }
            .to_text(),
            "Error: m"
        );
    }

    #[test]
    fn test_view_serializes_with_tag() {
        let value = serde_json::to_value(PopupView::Loading {
            message: "x".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"view": "loading", "message": "x"}));
    }
}
