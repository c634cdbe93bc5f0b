use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::DomainError;

/// Default request timeout for provider calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_bytes(&self, url: &str, query: &[(&str, &str)]) -> Result<Bytes, DomainError>;

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    async fn send(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, DomainError> {
        // Query strings carry the API key, so errors are reported without the URL.
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                DomainError::provider("http", format!("Request failed: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider_status(
                "http",
                status.as_u16(),
                format!("HTTP {}: {}", status, truncate(&error_body, 512)),
            ));
        }

        Ok(response)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_bytes(&self, url: &str, query: &[(&str, &str)]) -> Result<Bytes, DomainError> {
        self.send(url, query)
            .await?
            .bytes()
            .await
            .map_err(|e| {
                DomainError::provider("http", format!("Failed to read body: {}", e.without_url()))
            })
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, DomainError> {
        let body = self.get_bytes(url, query).await?;
        serde_json::from_slice(&body)
            .map_err(|e| DomainError::decode(format!("Failed to parse response: {}", e)))
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
