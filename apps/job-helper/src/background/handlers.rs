//! Axum route handlers for the background process.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::background::menu::{ContextMenuItem, MenuClick, MENU_ITEM_ID};
use crate::background::messages::respond;
use crate::popup::{render, PopupView};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ActivationAccepted {
    pub activation_id: Uuid,
}

/// GET /api/v1/context-menu
pub async fn handle_menu_items(State(state): State<AppState>) -> Json<Vec<ContextMenuItem>> {
    Json(vec![state.menu_item])
}

/// POST /api/v1/context-menu/click
///
/// Starts an activation in the background and returns at once; progress and the
/// outcome reach the popup through the broadcast stream.
pub async fn handle_menu_click(
    State(state): State<AppState>,
    Json(click): Json<MenuClick>,
) -> Response {
    if click.menu_item_id != MENU_ITEM_ID {
        return StatusCode::NO_CONTENT.into_response();
    }

    let activation_id = Uuid::new_v4();
    info!("Accepted menu activation {activation_id}");
    let menu = state.menu.clone();
    tokio::spawn(async move {
        menu.activate(activation_id, click).await;
    });

    (
        StatusCode::ACCEPTED,
        Json(ActivationAccepted { activation_id }),
    )
        .into_response()
}

/// POST /api/v1/messages
///
/// Request/response channel for the popup. Unknown requests get `204 No Content`.
pub async fn handle_message(State(state): State<AppState>, Json(request): Json<Value>) -> Response {
    match respond(&state.store, &request) {
        Some(current) => Json(current).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /api/v1/events
///
/// Broadcast stream: one SSE event per state transition.
pub async fn handle_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.broadcaster.subscribe()).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(e) => {
            warn!("Popup subscriber lagged behind: {e}");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// GET /api/v1/popup
///
/// The current state, already rendered into a popup view.
pub async fn handle_popup_view(State(state): State<AppState>) -> Json<PopupView> {
    let current = serde_json::to_value(state.store.current()).unwrap_or(Value::Null);
    Json(render(&current))
}
