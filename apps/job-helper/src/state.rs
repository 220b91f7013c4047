use std::sync::Arc;

use crate::background::broadcast::BroadcastMessenger;
use crate::background::menu::{ContextMenuItem, MenuHandler, OptionsPage};
use crate::background::store::StateStore;
use crate::gemini::ContentGenerator;
use crate::settings::SettingsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single owner of the last known `ApplicationState`; shared with `menu`.
    pub store: StateStore,
    /// Subscribed to by `/api/v1/events`; the same sender `menu` pushes through.
    pub broadcaster: BroadcastMessenger,
    pub settings: Arc<dyn SettingsStore>,
    pub menu: MenuHandler,
    pub menu_item: ContextMenuItem,
}

impl AppState {
    /// Wires the background process. The state starts at its default value,
    /// as on a fresh install.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        generator: Arc<dyn ContentGenerator>,
        options_page: Arc<dyn OptionsPage>,
    ) -> Self {
        let store = StateStore::default();
        let broadcaster = BroadcastMessenger::new();
        let menu = MenuHandler {
            store: store.clone(),
            messenger: Arc::new(broadcaster.clone()),
            settings: settings.clone(),
            generator,
            options_page,
        };
        Self {
            store,
            broadcaster,
            settings,
            menu,
            menu_item: ContextMenuItem::job_helper(),
        }
    }
}
