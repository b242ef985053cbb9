use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point on the court.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What the ball is attached to.
///
/// `Player` and `Ball` reference entities directly. `Attacking` and
/// `Defensive` are the team tags sent by the drawing frontend, where the
/// attachment id is the player's index within that team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Player,
    Ball,
    Attacking,
    Defensive,
}

impl AttachmentKind {
    /// Returns the wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Player => "player",
            AttachmentKind::Ball => "ball",
            AttachmentKind::Attacking => "attacking",
            AttachmentKind::Defensive => "defensive",
        }
    }
}

/// A reference from the ball to the entity currently holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallAttachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub id: i64,
}

impl BallAttachment {
    pub fn new(kind: AttachmentKind, id: i64) -> Self {
        Self { kind, id }
    }
}

/// Ball location recorded alongside a player sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BallState {
    pub position: Position,
    /// `None` means the ball is free.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<BallAttachment>,
}

impl BallState {
    /// Creates a free ball at the given position.
    pub fn free(position: Position) -> Self {
        Self {
            position,
            attached_to: None,
        }
    }

    /// Creates a ball attached to the given entity.
    pub fn attached(position: Position, attachment: BallAttachment) -> Self {
        Self {
            position,
            attached_to: Some(attachment),
        }
    }
}

/// One sampled frame of a single player during a recorded play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerState {
    pub player_id: String,
    pub position: Position,
    /// Sample time in milliseconds.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ball_state: Option<BallState>,
}

impl PlayerState {
    /// Creates a sample without ball information.
    pub fn new(player_id: impl Into<String>, position: Position, timestamp: i64) -> Self {
        Self {
            player_id: player_id.into(),
            position,
            timestamp,
            ball_state: None,
        }
    }

    /// Sets the ball state for this sample.
    pub fn with_ball_state(mut self, ball_state: BallState) -> Self {
        self.ball_state = Some(ball_state);
        self
    }
}

/// A recorded play: a named, ordered sequence of player samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Playback order. Never reordered.
    pub player_states: Vec<PlayerState>,
}

impl Play {
    /// Creates a new play with a fresh id and the current time.
    ///
    /// The timestamp is truncated to whole seconds so it renders as
    /// `YYYY-MM-DDTHH:MM:SSZ` both on the wire and in storage.
    pub fn new(name: impl Into<String>, player_states: Vec<PlayerState>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now().trunc_subsecs(0),
            player_states,
        }
    }

    /// Sets a specific ID for this play (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets a specific creation time for this play (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
