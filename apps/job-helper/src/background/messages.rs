//! Popup → background requests.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::store::{ApplicationState, StateStore};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum PopupRequest {
    #[serde(rename = "GET_LAST_KNOWN_STATE")]
    GetLastKnownState,
}

/// Answers a raw request object. Anything that isn't a known request gets no answer.
pub fn respond(store: &StateStore, request: &Value) -> Option<ApplicationState> {
    match PopupRequest::deserialize(request) {
        Ok(PopupRequest::GetLastKnownState) => Some(store.current()),
        Err(_) => {
            debug!("Ignoring unrecognized popup message: {request}");
            None
        }
    }
}
