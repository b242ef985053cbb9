//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and domain types.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};
use squiggle_core::play::{AttachmentKind, BallAttachment, BallState, Play, PlayerState, Position};
use squiggle_core::storage::RepositoryError;

type Item = HashMap<String, AttributeValue>;

/// Name of the table's hash key attribute.
pub const ID_ATTRIBUTE: &str = "id";

/// Build the primary key value for a play id.
pub fn play_key(id: &str) -> AttributeValue {
    AttributeValue::S(id.to_string())
}

// ============================================================================
// Play conversions
// ============================================================================

/// Convert a Play to DynamoDB item.
pub fn play_to_item(play: &Play) -> Item {
    let mut item = HashMap::new();

    item.insert(ID_ATTRIBUTE.to_string(), play_key(&play.id));
    item.insert("name".to_string(), AttributeValue::S(play.name.clone()));
    item.insert(
        "createdAt".to_string(),
        AttributeValue::S(play.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    item.insert(
        "playerStates".to_string(),
        AttributeValue::L(play.player_states.iter().map(player_state_to_attr).collect()),
    );

    item
}

/// Convert a DynamoDB item to Play.
pub fn item_to_play(item: &Item) -> Result<Play, RepositoryError> {
    let player_states = get_list(item, "playerStates")?
        .iter()
        .map(|value| {
            let map = value
                .as_m()
                .map_err(|_| invalid_field("playerStates"))?;
            item_to_player_state(map)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Play {
        id: get_string(item, ID_ATTRIBUTE)?,
        name: get_string(item, "name")?,
        created_at: get_datetime(item, "createdAt")?,
        player_states,
    })
}

// ============================================================================
// Nested conversions
// ============================================================================

fn player_state_to_attr(state: &PlayerState) -> AttributeValue {
    let mut map = HashMap::new();

    map.insert(
        "playerId".to_string(),
        AttributeValue::S(state.player_id.clone()),
    );
    map.insert("position".to_string(), position_to_attr(&state.position));
    map.insert("timestamp".to_string(), number(state.timestamp));
    if let Some(ball) = &state.ball_state {
        map.insert("ballState".to_string(), ball_state_to_attr(ball));
    }

    AttributeValue::M(map)
}

fn item_to_player_state(map: &Item) -> Result<PlayerState, RepositoryError> {
    let ball_state = match get_optional_map(map, "ballState")? {
        Some(ball) => Some(item_to_ball_state(ball)?),
        None => None,
    };

    Ok(PlayerState {
        player_id: get_string(map, "playerId")?,
        position: item_to_position(get_map(map, "position")?)?,
        timestamp: get_number(map, "timestamp")?,
        ball_state,
    })
}

fn ball_state_to_attr(ball: &BallState) -> AttributeValue {
    let mut map = HashMap::new();

    map.insert("position".to_string(), position_to_attr(&ball.position));
    if let Some(attachment) = &ball.attached_to {
        let mut attached = HashMap::new();
        attached.insert(
            "type".to_string(),
            AttributeValue::S(attachment.kind.as_str().to_string()),
        );
        attached.insert("id".to_string(), number(attachment.id));
        map.insert("attachedTo".to_string(), AttributeValue::M(attached));
    }

    AttributeValue::M(map)
}

fn item_to_ball_state(map: &Item) -> Result<BallState, RepositoryError> {
    let attached_to = match get_optional_map(map, "attachedTo")? {
        Some(attached) => Some(BallAttachment {
            kind: parse_attachment_kind(&get_string(attached, "type")?)?,
            id: get_number(attached, "id")?,
        }),
        None => None,
    };

    Ok(BallState {
        position: item_to_position(get_map(map, "position")?)?,
        attached_to,
    })
}

fn position_to_attr(position: &Position) -> AttributeValue {
    let mut map = HashMap::new();
    map.insert("x".to_string(), number(position.x));
    map.insert("y".to_string(), number(position.y));
    AttributeValue::M(map)
}

fn item_to_position(map: &Item) -> Result<Position, RepositoryError> {
    Ok(Position {
        x: get_number(map, "x")?,
        y: get_number(map, "y")?,
    })
}

// ============================================================================
// Attachment kind conversions
// ============================================================================

/// Parse AttachmentKind from its stored tag.
pub fn parse_attachment_kind(s: &str) -> Result<AttachmentKind, RepositoryError> {
    match s.to_lowercase().as_str() {
        "player" => Ok(AttachmentKind::Player),
        "ball" => Ok(AttachmentKind::Ball),
        "attacking" => Ok(AttachmentKind::Attacking),
        "defensive" => Ok(AttachmentKind::Defensive),
        _ => Err(RepositoryError::Serialization(format!(
            "Unknown attachment type: {}",
            s
        ))),
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn invalid_field(key: &str) -> RepositoryError {
    RepositoryError::Serialization(format!("Missing or invalid field: {}", key))
}

/// DynamoDB numbers travel as decimal strings.
fn number(value: impl Display) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| invalid_field(key))
}

/// Get a required numeric attribute.
fn get_number<T>(item: &Item, key: &str) -> Result<T, RepositoryError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| invalid_field(key))?;
    raw.parse().map_err(|e| {
        RepositoryError::Serialization(format!("Invalid number {} ({}): {}", key, raw, e))
    })
}

/// Get a required map attribute.
fn get_map<'a>(item: &'a Item, key: &str) -> Result<&'a Item, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_m().ok())
        .ok_or_else(|| invalid_field(key))
}

/// Get an optional map attribute. Absent and `NULL` both mean `None`.
fn get_optional_map<'a>(item: &'a Item, key: &str) -> Result<Option<&'a Item>, RepositoryError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) if value.is_null() => Ok(None),
        Some(value) => value.as_m().map(Some).map_err(|_| invalid_field(key)),
    }
}

/// Get a list attribute. Absent and `NULL` both read as an empty list.
fn get_list<'a>(item: &'a Item, key: &str) -> Result<&'a [AttributeValue], RepositoryError> {
    match item.get(key) {
        None => Ok(&[]),
        Some(value) if value.is_null() => Ok(&[]),
        Some(value) => value
            .as_l()
            .map(|list| list.as_slice())
            .map_err(|_| invalid_field(key)),
    }
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Serialization(format!("Invalid datetime {}: {}", key, e)))
}
