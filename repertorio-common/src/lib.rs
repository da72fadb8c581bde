//! # Repertorio Common Library
//!
//! Shared code for the repertoire service including:
//! - Song record model and identifier coercion rules
//! - Store abstraction over the backing JSON document
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod song;
pub mod store;

pub use error::{Error, Result};
pub use song::Song;
pub use store::{JsonFileStore, MemoryStore, SongStore};
