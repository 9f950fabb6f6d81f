/*!
 * Translation backend clients.
 *
 * This module contains client implementations for the translation backends:
 * - Google: keyless `gtx` web endpoint over a pooled HTTP client
 * - Mock: scripted behaviours for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// A backend translates one string at a time. Callers never pass empty text,
/// and `source_language` may be `auto`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a single string
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `target_language` - Target language code
    /// * `source_language` - Source language code or `auto`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the backend with a tiny request
    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate("hello", "en", "auto").await.map(|_| ())
    }

    /// Short backend name used in logs
    fn name(&self) -> &str;
}

pub mod google;
pub mod mock;
