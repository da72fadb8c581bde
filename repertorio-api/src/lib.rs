//! repertorio-api library - song repertoire HTTP service
//!
//! Routes:
//! - `GET /` landing page
//! - `GET /canciones`, `POST /canciones`
//! - `GET|PUT|DELETE /canciones/:id`
//! - `GET /health`, `GET /build_info`

use axum::Router;
use repertorio_common::SongStore;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod repertoire;

use repertoire::Repertoire;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub repertoire: Arc<Repertoire>,
    /// Landing page file served at `/`
    pub index_page: Arc<PathBuf>,
}

impl AppState {
    /// Create new application state around an injected store
    pub fn new(store: Arc<dyn SongStore>, index_page: impl Into<PathBuf>) -> Self {
        Self {
            repertoire: Arc::new(Repertoire::new(store)),
            index_page: Arc::new(index_page.into()),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let songs = Router::new()
        .route(
            "/canciones",
            get(api::list_songs).post(api::create_song),
        )
        .route(
            "/canciones/:id",
            get(api::get_song)
                .put(api::update_song)
                .delete(api::delete_song),
        );

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/build_info", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(songs)
        .merge(public)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Any origin may call the API
        .layer(CorsLayer::permissive())
}
