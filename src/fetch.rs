/*!
 * Download of remote subtitle files.
 */

use bytes::Bytes;
use log::debug;
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::app_config::FetchConfig;
use crate::errors::FetchError;
use crate::file_utils::decode_text;

/// HTTP client for subtitle downloads
#[derive(Debug, Clone)]
pub struct SubtitleFetcher {
    client: Client,
    user_agent: String,
}

impl SubtitleFetcher {
    /// Create a fetcher from download configuration
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| FetchError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Parse and check a subtitle URL (http and https only)
    pub fn parse_url(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(FetchError::InvalidUrl {
                url: url.to_string(),
                message: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// Download raw bytes; redirects are followed and only 200 is accepted
    pub async fn fetch(&self, url: &str, referer: Option<&str>) -> Result<Bytes, FetchError> {
        let url = Self::parse_url(url)?;
        debug!("Fetching subtitle from {}", url);

        let mut request = self.client.get(url).header(USER_AGENT, &self.user_agent);
        if let Some(referer) = referer.filter(|r| !r.trim().is_empty()) {
            request = request.header(REFERER, referer);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }

    /// Download and decode as text
    pub async fn fetch_text(&self, url: &str, referer: Option<&str>) -> Result<String, FetchError> {
        let bytes = self.fetch(url, referer).await?;
        Ok(decode_text(&bytes))
    }
}
