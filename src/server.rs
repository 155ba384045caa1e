//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::rendering::LabelFont;
use crate::services::{InMemorySessionStore, PixelArtPipeline};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<InMemorySessionStore>,
    pub pipeline: Arc<PixelArtPipeline>,
    pub config: Arc<AppConfig>,
}

/// Create application state, resolving the label font from the config.
pub fn create_app_state(config: AppConfig) -> AppState {
    let font = LabelFont::resolve(&config.fonts.families, config.fonts.dir.as_deref());
    create_app_state_with_font(config, font)
}

/// Create application state with an already resolved label font.
pub fn create_app_state_with_font(config: AppConfig, font: LabelFont) -> AppState {
    let pipeline = PixelArtPipeline::from_config(&config, Arc::new(font));

    AppState {
        sessions: Arc::new(InMemorySessionStore::from_config(&config)),
        pipeline: Arc::new(pipeline),
        config: Arc::new(config),
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/api/sessions", post(api::create_session))
        .route(
            "/api/sessions/:id",
            get(api::get_session).delete(api::delete_session),
        )
        .route("/api/sessions/:id/settings", put(api::update_settings))
        .route("/api/sessions/:id/palette", axum::routing::delete(api::reset_palette))
        .route("/api/sessions/:id/palette/:index", put(api::set_palette_color))
        .route("/api/sessions/:id/image.png", get(api::handle_image))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .fallback(|| async { ApiError::NotFound })
        // Add state, upload limit and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
