//! Health check operations.

use super::SquiggleClient;
use crate::error::Result;

impl SquiggleClient {
    /// Call the liveness probe and return its body.
    pub async fn health(&self) -> Result<String> {
        let response = self.client.get(self.url("/api/health")).send().await?;
        let response = Self::check_status(response, "health endpoint").await?;
        Ok(response.text().await?)
    }
}
