//! Play API operations.

use super::SquiggleClient;
use crate::error::Result;
use squiggle_core::play::{CreatePlayRequest, Play};

impl SquiggleClient {
    /// List all plays.
    pub async fn list_plays(&self) -> Result<Vec<Play>> {
        let response = self.client.get(self.url("/api/plays")).send().await?;
        self.handle_response(response, "plays").await
    }

    /// Create a new play. The server assigns the id and creation time.
    pub async fn create_play(&self, req: &CreatePlayRequest) -> Result<Play> {
        let response = self
            .client
            .post(self.url("/api/plays"))
            .json(req)
            .send()
            .await?;
        self.handle_response(response, "plays").await
    }

    /// Get play by ID.
    pub async fn get_play(&self, id: &str) -> Result<Play> {
        let response = self
            .client
            .get(self.url(&format!("/api/plays/{}", id)))
            .send()
            .await?;
        self.handle_response(response, &format!("play {}", id))
            .await
    }

    /// Delete play by ID. Deleting an unknown play succeeds.
    pub async fn delete_play(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/plays/{}", id)))
            .send()
            .await?;
        self.handle_empty_response(response, &format!("play {}", id))
            .await
    }
}
