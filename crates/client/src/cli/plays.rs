//! Play CLI commands.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use squiggle_core::play::PlayerState;

use crate::error::{ClientError, Result};

/// Play management commands.
#[derive(Debug, Parser)]
pub struct PlaysCommand {
    #[command(subcommand)]
    pub action: PlaysAction,
}

/// Available play actions.
#[derive(Debug, Subcommand)]
pub enum PlaysAction {
    /// List all plays.
    List,
    /// Create a new play.
    Create {
        /// Play name.
        #[arg(long)]
        name: String,
        /// JSON file holding the array of player states.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Get play by ID.
    Get {
        /// Play ID.
        id: String,
    },
    /// Delete play by ID.
    Delete {
        /// Play ID.
        id: String,
    },
}

/// Read player states for `plays create` from a JSON file.
///
/// Without a file the play is created with no player states.
pub fn load_player_states(file: Option<&Path>) -> Result<Vec<PlayerState>> {
    match file {
        Some(path) => parse_player_states(&std::fs::read_to_string(path)?),
        None => Ok(Vec::new()),
    }
}

fn parse_player_states(contents: &str) -> Result<Vec<PlayerState>> {
    serde_json::from_str(contents).map_err(|e| {
        ClientError::InvalidInput(format!("expected a JSON array of player states: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use squiggle_core::play::{AttachmentKind, Position};

    #[test]
    fn test_no_file_means_no_states() {
        assert!(load_player_states(None).unwrap().is_empty());
    }

    #[test]
    fn test_parse_player_states() {
        let states = parse_player_states(
            r#"[
                {"playerId": "p1", "position": {"x": 1.0, "y": 2.0}, "timestamp": 1000},
                {"playerId": "p2", "position": {"x": 3.0, "y": 4.0}, "timestamp": 1016,
                 "ballState": {"position": {"x": 3.0, "y": 4.0},
                               "attachedTo": {"type": "player", "id": 2}}}
            ]"#,
        )
        .unwrap();

        assert_eq!(states.len(), 2);
        assert_eq!(states[0].position, Position::new(1.0, 2.0));
        let attachment = states[1]
            .ball_state
            .as_ref()
            .and_then(|b| b.attached_to.as_ref())
            .unwrap();
        assert_eq!(attachment.kind, AttachmentKind::Player);
    }

    #[test]
    fn test_object_instead_of_array_is_invalid_input() {
        let err = parse_player_states(r#"{"playerId": "p1"}"#).unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_player_states(Some(Path::new("/nonexistent/states.json"))).unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
