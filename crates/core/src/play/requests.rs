//! API request types for play operations.
//!
//! These types are shared between the server and client for type-safe API communication.

use serde::{Deserialize, Serialize};

use super::types::{Play, PlayerState};

/// Request payload for creating a new play.
///
/// Both fields fall back to their empty value when missing from the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePlayRequest {
    pub name: String,
    pub player_states: Vec<PlayerState>,
}

impl CreatePlayRequest {
    /// Create a new request with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player_states: Vec::new(),
        }
    }

    /// Set the recorded player states.
    pub fn with_player_states(mut self, player_states: Vec<PlayerState>) -> Self {
        self.player_states = player_states;
        self
    }

    /// Convert into a Play with a server-assigned id and creation time.
    pub fn into_play(self) -> Play {
        Play::new(self.name, self.player_states)
    }
}
