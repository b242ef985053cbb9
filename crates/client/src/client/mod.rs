//! HTTP client for the squiggle API.

pub mod health;
pub mod plays;

use crate::error::{ClientError, Result};

/// Default server address, matching the server's default port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// HTTP client for the squiggle API.
#[derive(Debug, Clone)]
pub struct SquiggleClient {
    client: reqwest::Client,
    base_url: String,
}

impl SquiggleClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a JSON body or turn the status into a `ClientError`.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T> {
        let response = Self::check_status(response, resource).await?;
        response.json().await.map_err(ClientError::from)
    }

    /// Handle responses where no body is expected.
    async fn handle_empty_response(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<()> {
        Self::check_status(response, resource).await?;
        Ok(())
    }

    async fn check_status(
        response: reqwest::Response,
        resource: &str,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status.as_u16() == 404 {
            Err(ClientError::NotFound {
                resource: resource.to_string(),
            })
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }
}
