/*!
 * Database module for persistent storage of translated subtitles.
 *
 * This module provides:
 * - SQLite metadata for every stored translation, keyed by a fingerprint
 * - The on-disk WebVTT content of each translation
 */

pub mod connection;
pub mod files;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use files::ContentStore;
pub use models::{SubtitleRecord, SubtitleWithContent};
pub use repository::Repository;
