//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use squiggle_core::play::Play;
use squiggle_core::storage::{PlayRepository, Result};

/// In-memory storage backend.
///
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    plays: Arc<RwLock<HashMap<String, Play>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayRepository for InMemoryRepository {
    async fn create_play(&self, play: &Play) -> Result<()> {
        let mut plays = self.plays.write().await;
        plays.insert(play.id.clone(), play.clone());
        Ok(())
    }

    async fn list_plays(&self) -> Result<Vec<Play>> {
        let plays = self.plays.read().await;
        Ok(plays.values().cloned().collect())
    }

    async fn get_play(&self, id: &str) -> Result<Option<Play>> {
        let plays = self.plays.read().await;
        Ok(plays.get(id).cloned())
    }

    async fn delete_play(&self, id: &str) -> Result<()> {
        let mut plays = self.plays.write().await;
        plays.remove(id);
        Ok(())
    }
}
