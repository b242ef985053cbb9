//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It holds the play repository as a trait object so the
//! handlers do not depend on the storage backend chosen at compile time.

use std::sync::Arc;

use squiggle_core::storage::PlayRepository;

use crate::config::Config;

/// Shared application state.
///
/// Cloned for each request handler; the repository is the only shared
/// resource and manages its own concurrency.
#[derive(Clone)]
pub struct AppState {
    /// Play repository.
    pub play_repo: Arc<dyn PlayRepository>,
}

impl AppState {
    /// Creates AppState around an existing repository.
    pub fn from_repository(play_repo: Arc<dyn PlayRepository>) -> Self {
        Self { play_repo }
    }
}

// ============================================================================
// Factory functions for the different storage backends
// ============================================================================

#[cfg(feature = "dynamodb")]
mod dynamodb_backend {
    use super::*;
    use crate::storage::DynamoDbRepository;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        ///
        /// Fails when the configured table cannot be described, so a
        /// misconfigured endpoint stops the process before it listens.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!(target = %config.store.target_display(), "Connecting to play store");

            let repo = DynamoDbRepository::connect(&config.store).await;
            repo.verify_table().await?;

            tracing::info!(table = %repo.table_name(), "Connected to DynamoDB");

            Ok(Self::from_repository(Arc::new(repo)))
        }
    }
}

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for running without any external dependencies.
        pub async fn new(_config: &Config) -> Result<Self, anyhow::Error> {
            tracing::warn!("Using in-memory play store; data is lost on shutdown");
            Ok(Self::from_repository(Arc::new(InMemoryRepository::new())))
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        Self::from_repository(Arc::new(crate::storage::InMemoryRepository::new()))
    }
}
