use async_trait::async_trait;

use crate::play::Play;

use super::Result;

/// Repository for play records.
///
/// Every method maps to exactly one store operation. There is no update:
/// plays are written once and then only read or deleted.
#[async_trait]
pub trait PlayRepository: Send + Sync {
    /// Writes a play unconditionally, replacing any record with the same id.
    async fn create_play(&self, play: &Play) -> Result<()>;

    /// Returns every stored play, in whatever order the store yields them.
    async fn list_plays(&self) -> Result<Vec<Play>>;

    /// Gets a play by its ID.
    async fn get_play(&self, id: &str) -> Result<Option<Play>>;

    /// Deletes a play by its ID. Deleting a missing id succeeds.
    async fn delete_play(&self, id: &str) -> Result<()>;
}
