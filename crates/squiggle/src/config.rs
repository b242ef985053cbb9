use std::{env, time::Duration};

/// Connection settings for the play store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// DynamoDB table holding plays (default: "Plays")
    pub table_name: String,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Custom endpoint URL, e.g. a local DynamoDB (default: none)
    pub endpoint_url: Option<String>,
    /// Use fixed dummy credentials instead of the AWS credential chain.
    /// Set when an endpoint is configured without `AWS_ACCESS_KEY_ID`.
    pub static_credentials: bool,
}

impl StoreConfig {
    /// Returns a display string for the target store.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({}, table {})", url, self.table_name),
            None => format!(
                "AWS DynamoDB (region: {}, table {})",
                self.region, self.table_name
            ),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Play store connection settings.
    pub store: StoreConfig,
    /// Origin allowed to call the API from a browser (default: "http://localhost:5173")
    pub frontend_origin: String,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// How long shutdown waits for in-flight requests, in seconds (default: 10)
    pub shutdown_grace_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PLAYS_TABLE_NAME` - DynamoDB table name (default: "Plays")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `DYNAMODB_ENDPOINT` / `AWS_ENDPOINT_URL` - Custom endpoint (default: none)
    /// - `AWS_ACCESS_KEY_ID` - When absent with a custom endpoint, dummy credentials are used
    /// - `FRONTEND_ORIGIN` - Allowed CORS origin (default: "http://localhost:5173")
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    /// - `SHUTDOWN_GRACE_SECONDS` - Shutdown grace period (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint_url = lookup("DYNAMODB_ENDPOINT")
            .or_else(|| lookup("AWS_ENDPOINT_URL"))
            .filter(|url| !url.is_empty());
        let static_credentials = endpoint_url.is_some() && lookup("AWS_ACCESS_KEY_ID").is_none();

        Self {
            store: StoreConfig {
                table_name: lookup("PLAYS_TABLE_NAME").unwrap_or_else(|| "Plays".to_string()),
                region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint_url,
                static_credentials,
            },
            frontend_origin: lookup("FRONTEND_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            shutdown_grace_seconds: lookup("SHUTDOWN_GRACE_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get shutdown grace period as a Duration.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
