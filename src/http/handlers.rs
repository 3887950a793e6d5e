//! HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::SyncError;
use crate::hook::{HookOutcome, PlaylistChanged};
use crate::model::SnapshotPayload;
use crate::state::AppState;

/// HTTP error type
#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                format!("invalid body provided: {} !", msg),
            ),
            HttpError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, body).into_response()
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::info!("Invalid body provided: {}", rejection.body_text());
        HttpError::BadRequest(rejection.body_text())
    }
}

impl From<SyncError> for HttpError {
    fn from(err: SyncError) -> Self {
        HttpError::InternalError(err.to_string())
    }
}

/// Body of record start/stop requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRequest {
    pub id: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("jukebox-sync v", env!("CARGO_PKG_VERSION"))
}

/// Playlist changed in the host jukebox
/// POST /v1/jukebox/playlist
pub async fn playlist_changed(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlaylistChanged>, JsonRejection>,
) -> Result<(StatusCode, Json<HookOutcome>), HttpError> {
    let Json(event) = body?;
    let outcome = state
        .hook
        .on_playlist_changed(event, |_| state.observe_playlist())
        .await;
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}

/// Start a record
/// POST /v1/jukeboxsyncer/start
pub async fn start_record(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RecordRequest>, JsonRejection>,
) -> Result<StatusCode, HttpError> {
    let Json(target) = body?;

    if let Err(e) = state.syncer.start(&target.id).await {
        tracing::error!("While starting a new record with id {}: {}", target.id, e);
        return Err(e.into());
    }
    tracing::info!("Starting a new record with id {}", target.id);
    Ok(StatusCode::ACCEPTED)
}

/// Stop a record
/// POST /v1/jukeboxsyncer/stop
pub async fn stop_record(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RecordRequest>, JsonRejection>,
) -> Result<StatusCode, HttpError> {
    let Json(target) = body?;

    if let Err(e) = state.syncer.stop(&target.id).await {
        tracing::error!("While stopping existing record with id {}: {}", target.id, e);
        return Err(e.into());
    }
    tracing::info!("Stopping existing record with id {}", target.id);
    Ok(StatusCode::ACCEPTED)
}

/// Jukebox snapshot for a started record
/// POST /v1/jukeboxsyncer/evt
pub async fn snapshot_event(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SnapshotPayload>, JsonRejection>,
) -> Result<StatusCode, HttpError> {
    let Json(snapshot) = body?;
    tracing::debug!(
        "Processing snapshot of room {} from {} ({} tracks)",
        snapshot.room_id,
        snapshot.user_id,
        snapshot.tracks.len()
    );

    let room_id = snapshot.room_id.clone();
    if let Err(e) = state.syncer.handle(snapshot).await {
        tracing::error!("While processing snapshot of room {}: {}", room_id, e);
    }
    Ok(StatusCode::ACCEPTED)
}

/// Debug endpoint - resolution cache and syncer state
/// GET /debug/cache
pub async fn debug_cache(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.cache_stats();

    Json(serde_json::json!({
        "cache": {
            "entry_count": stats.entry_count,
            "resolved": stats.resolved,
            "unavailable": stats.unavailable,
            "timed_out": stats.timed_out,
        },
        "playlist_changes": state.playlist_change_count(),
        "started_records": state.syncer.started_count(),
    }))
}
