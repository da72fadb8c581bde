//! Song CRUD endpoints
//!
//! The `:id` segment is extracted as a raw string so ids that are not numbers
//! reach the repertoire and come back as "not found" instead of a rejection.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use repertorio_common::Song;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::AppState;

pub const SONG_UPDATED: &str = "Canción modificada con éxito";
pub const SONG_DELETED: &str = "Canción eliminada con éxito";

/// Song fields sent by the client
///
/// A request without a JSON content type, or with an empty body, carries no
/// fields. A JSON body must be a well-formed object, otherwise the request is
/// rejected before the store is touched.
#[derive(Debug, Default)]
pub struct SongBody(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for SongBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Ok(SongBody::default());
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        if bytes.is_empty() {
            return Ok(SongBody::default());
        }

        let Json(fields) =
            Json::<Map<String, Value>>::from_bytes(&bytes).map_err(IntoResponse::into_response)?;
        Ok(SongBody(fields))
    }
}

/// `application/json` or any `+json` media type, parameters ignored
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// GET /canciones
pub async fn list_songs(State(state): State<AppState>) -> Json<Vec<Song>> {
    Json(state.repertoire.list().await)
}

/// GET /canciones/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Song>, ApiError> {
    state
        .repertoire
        .get(&id)
        .await
        .map(Json)
        .ok_or(ApiError::SongNotFoundJson)
}

/// POST /canciones
///
/// Echoes the stored record, including the coerced `id`.
pub async fn create_song(
    State(state): State<AppState>,
    SongBody(body): SongBody,
) -> Result<Json<Song>, ApiError> {
    let song = state.repertoire.create(body).await?;
    Ok(Json(song))
}

/// PUT /canciones/:id
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    SongBody(body): SongBody,
) -> Result<&'static str, ApiError> {
    match state.repertoire.update(&id, body).await? {
        Some(_) => Ok(SONG_UPDATED),
        None => Err(ApiError::SongNotFound),
    }
}

/// DELETE /canciones/:id
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    match state.repertoire.delete(&id).await? {
        Some(_) => Ok(SONG_DELETED),
        None => Err(ApiError::SongNotFound),
    }
}
