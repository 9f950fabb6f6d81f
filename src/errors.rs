/*!
 * Error types for the subtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when calling a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport or network failure while calling the translation service
    #[error("Translation backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The service answered with a non-success status
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Malformed or unexpected response shape
    #[error("Failed to parse API response: {0}")]
    BadResponse(String),

    /// The service answered but produced no translated text
    #[error("Translation backend returned an empty result")]
    EmptyResult,
}

impl ProviderError {
    /// Whether the error comes from the transport rather than the payload
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_) | Self::ApiError { .. })
    }
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Caption format name not recognised
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),
}

/// Errors that can occur while downloading a subtitle file
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed
    #[error("Invalid subtitle URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The request could not be sent or the connection failed
    #[error("Failed to fetch subtitle: {0}")]
    RequestFailed(String),

    /// The server answered with a non-200 status
    #[error("Failed to fetch subtitle: status {0}")]
    Status(u16),

    /// The body could not be read
    #[error("Failed to read response: {0}")]
    Body(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error with subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// A multiplexed response could not be split back into its items.
    /// Recovered by the dispatcher and never returned to callers.
    #[error("Batch split mismatch (got {actual} parts for {expected} lines)")]
    SplitMismatch { expected: usize, actual: usize },

    /// Texts were submitted but not a single one came back translated
    #[error("No translation could be obtained for any of the {attempted} submitted texts")]
    NothingTranslated { attempted: usize },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error while fetching a remote subtitle
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Stored subtitle not found
    #[error("Subtitle not found: {0}")]
    NotFound(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
