pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::background::handlers;
use crate::settings::handlers as settings_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Menu surface
        .route("/api/v1/context-menu", get(handlers::handle_menu_items))
        .route(
            "/api/v1/context-menu/click",
            post(handlers::handle_menu_click),
        )
        // Popup ⇄ background
        .route("/api/v1/messages", post(handlers::handle_message))
        .route("/api/v1/events", get(handlers::handle_events))
        .route("/api/v1/popup", get(handlers::handle_popup_view))
        // Settings surface
        .route(
            "/api/v1/settings",
            get(settings_handlers::handle_get_settings)
                .put(settings_handlers::handle_save_settings),
        )
        .with_state(state)
}
