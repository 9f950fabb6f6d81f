use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::app_config::BackendConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// Longest error body kept in an `ApiError` message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the keyless Google Translate web endpoint
///
/// One pooled `reqwest::Client` is built per instance and shared by every
/// call, so concurrent chunk tasks reuse idle connections.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    /// Endpoint URL without query
    endpoint: Url,
    /// HTTP client for making requests
    client: Client,
}

impl GoogleTranslate {
    /// Create a new client from backend configuration
    pub fn new(config: &BackendConfig) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ProviderError::BackendUnavailable(format!(
                "Invalid backend endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_connections)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| {
                ProviderError::BackendUnavailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { endpoint, client })
    }

    /// Build the request URL for one string
    pub fn request_url(&self, text: &str, target_language: &str, source_language: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", source_language)
            .append_pair("tl", target_language)
            .append_pair("dt", "t")
            .append_pair("q", text);
        url
    }

    /// Extract the translation from a response body.
    ///
    /// The body is a nested JSON array; the first element lists segments whose
    /// first element is the translated text. Segments are concatenated.
    pub fn parse_response(body: &str) -> Result<String, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::BadResponse(format!("Invalid JSON: {}", e)))?;

        let root = value
            .as_array()
            .ok_or_else(|| ProviderError::BadResponse("Expected a top-level array".to_string()))?;
        if root.is_empty() {
            return Err(ProviderError::EmptyResult);
        }

        let segments = root[0]
            .as_array()
            .filter(|segments| !segments.is_empty())
            .ok_or_else(|| {
                ProviderError::BadResponse("Missing translation segments".to_string())
            })?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if translated.is_empty() {
            return Err(ProviderError::EmptyResult);
        }

        Ok(translated)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, ProviderError> {
        let url = self.request_url(text, target_language, source_language);
        debug!(
            "Sending {} chars to {} ({} -> {})",
            text.chars().count(),
            self.endpoint.host_str().unwrap_or("backend"),
            source_language,
            target_language
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::BackendUnavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::BackendUnavailable(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            error!("Translation backend error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        Self::parse_response(&body)
    }

    fn name(&self) -> &str {
        "google"
    }
}
