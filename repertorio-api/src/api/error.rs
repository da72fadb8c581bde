//! HTTP error mapping for the song routes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

/// Message returned whenever an id has no matching song
pub const SONG_NOT_FOUND: &str = "Canción no encontrada";

/// Message returned when the collection could not be persisted
pub const SAVE_FAILED: &str = "Error al guardar el repertorio";

/// Song API errors
#[derive(Debug)]
pub enum ApiError {
    /// 404 with a JSON `{"mensaje": ...}` body (lookup route)
    SongNotFoundJson,
    /// 404 with a plain-text body (update and delete routes)
    SongNotFound,
    /// 500, collection not saved
    Storage(String),
}

impl From<repertorio_common::Error> for ApiError {
    fn from(e: repertorio_common::Error) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::SongNotFoundJson => (
                StatusCode::NOT_FOUND,
                Json(json!({ "mensaje": SONG_NOT_FOUND })),
            )
                .into_response(),
            ApiError::SongNotFound => (StatusCode::NOT_FOUND, SONG_NOT_FOUND).into_response(),
            ApiError::Storage(detail) => {
                warn!("Responding 500 after storage failure: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED).into_response()
            }
        }
    }
}
