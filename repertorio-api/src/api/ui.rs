//! Landing page
//!
//! The page is read from disk on every request so it can be edited without a
//! restart. Bytes are served as-is, whatever their encoding. A missing file
//! answers 404.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::warn;

use crate::AppState;

/// GET /
pub async fn serve_index(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.index_page.as_path()).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            warn!("Cannot serve {}: {}", state.index_page.display(), e);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
