/*!
 * # subtrans - subtitle translation with cached results
 *
 * A Rust library for translating WebVTT and ASS subtitles through a web
 * translation backend.
 *
 * ## Features
 *
 * - Parse WebVTT/SRT and ASS/SSA captions, always emit WebVTT
 * - Pack many caption lines into one request with random separator tokens
 * - Fall back to smaller chunks and single lines when a request fails
 * - Informal register for Indonesian output
 * - Store translated subtitles in SQLite plus one file per translation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `captions`: Caption parsing and WebVTT rendering
 * - `translation`: Translation pipeline:
 *   - `translation::batch`: Chunking, multiplexing and fallback
 *   - `translation::informal`: Indonesian informal rewriting
 *   - `translation::core`: Document and text translation service
 * - `providers`: Translation backends (`google`, `mock`)
 * - `database`: Stored translations (SQLite metadata and content files)
 * - `fetch`: Remote subtitle downloads
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod captions;
pub mod database;
pub mod errors;
pub mod fetch;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FolderSummary, SubtitlePage};
pub use captions::{CaptionDocument, CaptionFormat};
pub use translation::TranslationService;
pub use language_utils::{validate_source_language, validate_target_language};
pub use errors::{AppError, FetchError, ProviderError, SubtitleError, TranslationError};
