//! The single "last known state" owned by the background process.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

pub const INITIAL_MESSAGE: &str = "Right-click a job description to begin.";
pub const LOADING_MESSAGE: &str = "Generating tailored content...";

/// What the popup should currently display. Serialized with a `type` tag,
/// which is also the wire format of every broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApplicationState {
    #[serde(rename = "INITIAL")]
    Initial { message: String },

    #[serde(rename = "SHOW_LOADING")]
    Loading { message: String },

    #[serde(rename = "SHOW_RESULTS")]
    Results { payload: ResultsPayload },

    #[serde(rename = "SHOW_RESULTS_ERROR")]
    ResultsError { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPayload {
    pub tailored_resume: String,
    pub cover_letter: String,
}

impl Default for ApplicationState {
    fn default() -> Self {
        ApplicationState::Initial {
            message: INITIAL_MESSAGE.to_string(),
        }
    }
}

impl ApplicationState {
    pub fn loading() -> Self {
        ApplicationState::Loading {
            message: LOADING_MESSAGE.to_string(),
        }
    }

    pub fn results(tailored_resume: String, cover_letter: String) -> Self {
        ApplicationState::Results {
            payload: ResultsPayload {
                tailored_resume,
                cover_letter,
            },
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApplicationState::ResultsError {
            message: message.into(),
        }
    }

    /// The wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ApplicationState::Initial { .. } => "INITIAL",
            ApplicationState::Loading { .. } => "SHOW_LOADING",
            ApplicationState::Results { .. } => "SHOW_RESULTS",
            ApplicationState::ResultsError { .. } => "SHOW_RESULTS_ERROR",
        }
    }
}

/// Shared handle to the current state. Every write replaces the whole value.
#[derive(Clone, Default)]
pub struct StateStore {
    inner: Arc<RwLock<ApplicationState>>,
}

impl StateStore {
    pub fn new(initial: ApplicationState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn current(&self) -> ApplicationState {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set(&self, state: ApplicationState) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }
}
