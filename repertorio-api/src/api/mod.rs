//! HTTP API handlers for repertorio-api

pub mod buildinfo;
pub mod canciones;
pub mod error;
pub mod health;
pub mod ui;

pub use buildinfo::get_build_info;
pub use canciones::{create_song, delete_song, get_song, list_songs, update_song};
pub use error::ApiError;
pub use health::health_routes;
pub use ui::serve_index;
