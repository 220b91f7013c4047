use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use job_helper::background::menu::{LoggingOptionsPage, MENU_ITEM_TITLE};
use job_helper::config::Config;
use job_helper::gemini::GeminiClient;
use job_helper::routes::build_router;
use job_helper::settings::open_store;
use job_helper::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on invalid values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("job_helper={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AI Job Helper background v{}", env!("CARGO_PKG_VERSION"));

    let settings = open_store(&config.settings_backend)?;
    info!("Settings backend: {:?}", config.settings_backend);

    let gemini = GeminiClient::new(config.gemini_api_base.clone(), config.gemini_model.clone());
    info!("Gemini client initialized (model: {})", gemini.model());

    let options_page = LoggingOptionsPage::new(config.options_page_url.clone());

    let state = AppState::new(settings, Arc::new(gemini), Arc::new(options_page));
    info!("Context menu registered: {MENU_ITEM_TITLE}");

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
