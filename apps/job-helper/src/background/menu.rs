//! Context-menu activation.
//!
//! Flow: validate selection → SHOW_LOADING → load settings → tailor resume →
//!       draft cover letter → SHOW_RESULTS. Any failure ends in SHOW_RESULTS_ERROR.
//!
//! Every transition is stored first, then broadcast. The two generation calls are
//! strictly sequential; the cover letter is never requested if the resume call fails.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::broadcast::{report_delivery, Messenger};
use super::store::{ApplicationState, StateStore};
use crate::errors::HelperError;
use crate::gemini::prompts::{build_cover_letter_prompt, build_resume_prompt};
use crate::gemini::ContentGenerator;
use crate::settings::{Settings, SettingsStore};

pub const MENU_ITEM_ID: &str = "aiJobHelper";
pub const MENU_ITEM_TITLE: &str = "AI: Tailor Resume & Draft Cover Letter";

/// The one registered context-menu entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextMenuItem {
    pub id: &'static str,
    pub title: &'static str,
    /// Only shown when text is selected.
    pub contexts: Vec<&'static str>,
}

impl ContextMenuItem {
    pub fn job_helper() -> Self {
        Self {
            id: MENU_ITEM_ID,
            title: MENU_ITEM_TITLE,
            contexts: vec!["selection"],
        }
    }
}

/// A menu activation as delivered by the host.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    pub menu_item_id: String,
    #[serde(default)]
    pub selection_text: Option<String>,
}

/// Surface where the user enters their API key and resume.
pub trait OptionsPage: Send + Sync {
    fn open(&self);
}

/// Announces the settings URL in the log; the host decides how to show it.
pub struct LoggingOptionsPage {
    url: String,
}

impl LoggingOptionsPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl OptionsPage for LoggingOptionsPage {
    fn open(&self) {
        info!("Settings required; open {} to configure", self.url);
    }
}

/// Everything an activation touches, injected once at startup.
#[derive(Clone)]
pub struct MenuHandler {
    pub store: StateStore,
    pub messenger: Arc<dyn Messenger>,
    pub settings: Arc<dyn SettingsStore>,
    pub generator: Arc<dyn ContentGenerator>,
    pub options_page: Arc<dyn OptionsPage>,
}

impl MenuHandler {
    /// Runs one activation to completion. Returns the final state, or `None`
    /// when the click belongs to some other menu item.
    pub async fn on_clicked(&self, click: MenuClick) -> Option<ApplicationState> {
        self.activate(Uuid::new_v4(), click).await
    }

    /// Same as `on_clicked`, tagged with a caller-chosen id for log correlation.
    pub async fn activate(
        &self,
        activation_id: Uuid,
        click: MenuClick,
    ) -> Option<ApplicationState> {
        if click.menu_item_id != MENU_ITEM_ID {
            return None;
        }

        let span = info_span!("menu_activation", %activation_id);

        let final_state = async {
            info!("Menu activation started");
            let (state, open_options) = match self.run(click.selection_text.as_deref()).await {
                Ok(state) => (state, false),
                Err(e) => {
                    error!("Processing pipeline error: {e}");
                    let open_options = matches!(e, HelperError::SettingsMissing);
                    (ApplicationState::error(e.user_message()), open_options)
                }
            };
            self.transition(state.clone());
            // Settings open only after the error is stored and broadcast.
            if open_options {
                self.options_page.open();
            }
            info!("Menu activation finished: {}", state.kind());
            state
        }
        .instrument(span)
        .await;

        Some(final_state)
    }

    async fn run(&self, selection: Option<&str>) -> Result<ApplicationState, HelperError> {
        let selection = selection
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(HelperError::EmptySelection)?;

        // Announced before any I/O so an open popup shows progress.
        self.transition(ApplicationState::loading());

        let settings = self.load_settings().await?;

        let tailored_resume = self
            .generator
            .generate(
                &settings.api_key,
                &build_resume_prompt(&settings.user_resume, selection),
            )
            .await?;
        let cover_letter = self
            .generator
            .generate(
                &settings.api_key,
                &build_cover_letter_prompt(&settings.user_resume, selection),
            )
            .await?;

        Ok(ApplicationState::results(tailored_resume, cover_letter))
    }

    async fn load_settings(&self) -> Result<Settings, HelperError> {
        let stored = self.settings.load().await.map_err(|e| {
            error!("Error reading extension settings: {e}");
            HelperError::SettingsUnavailable(e.to_string())
        })?;
        stored.complete().ok_or(HelperError::SettingsMissing)
    }

    fn transition(&self, state: ApplicationState) {
        self.store.set(state.clone());
        report_delivery(self.messenger.send(&state));
    }
}
