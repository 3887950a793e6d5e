//! Axum router configuration

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{
    debug_cache, health_check, playlist_changed, snapshot_event, start_record, stop_record,
    version_check,
};

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // Health and version endpoints
        .route("/health", get(health_check))
        .route("/version", get(version_check))
        // Debug endpoints
        .route("/debug/cache", get(debug_cache))
        // Publishing side
        .route("/v1/jukebox/playlist", post(playlist_changed))
        // Receiving side
        .route("/v1/jukeboxsyncer/start", post(start_record))
        .route("/v1/jukeboxsyncer/stop", post(stop_record))
        .route("/v1/jukeboxsyncer/evt", post(snapshot_event))
        .layer(TraceLayer::new_for_http());

    // The host page posts from its own origin
    let router = if state.config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
            .max_age(Duration::from_secs(3600));
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}
