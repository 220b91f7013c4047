pub mod background;
pub mod config;
pub mod errors;
pub mod gemini;
pub mod popup;
pub mod routes;
pub mod settings;
pub mod state;
