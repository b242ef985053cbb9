//! Play CRUD handlers.
//!
//! Each handler issues exactly one repository call. Plays are never
//! updated, so there is no PUT/PATCH route.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use squiggle_core::play::{CreatePlayRequest, Play};
use squiggle_core::storage::RepositoryError;

use crate::{handlers::AppError, state::AppState};

/// Error response with message (for body validation errors).
fn error_response(status: StatusCode, message: impl Into<String>) -> (StatusCode, String) {
    let msg = message.into();
    tracing::warn!(status = %status, message = %msg, "API error");
    (status, msg)
}

/// Create a new play (POST /api/plays).
///
/// The body is decoded as JSON whatever its `Content-Type`. Anything that
/// fails to decode is rejected with 400 before the store is touched. A body
/// over the request size limit keeps its 413 from the `Bytes` extractor.
pub async fn create_play(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Play>, Response> {
    let payload = parse_create_request(&body).map_err(IntoResponse::into_response)?;

    create_play_impl(&state, payload)
        .await
        .map_err(IntoResponse::into_response)
}

fn parse_create_request(body: &[u8]) -> Result<CreatePlayRequest, (StatusCode, String)> {
    serde_json::from_slice(body).map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", e),
        )
    })
}

async fn create_play_impl(
    state: &AppState,
    payload: CreatePlayRequest,
) -> Result<Json<Play>, AppError> {
    tracing::debug!(
        name = %payload.name,
        player_states = payload.player_states.len(),
        "Received create play request"
    );

    let play = payload.into_play();

    state.play_repo.create_play(&play).await?;

    tracing::info!(play_id = %play.id, name = %play.name, "Created new play");

    Ok(Json(play))
}

/// List all plays (GET /api/plays).
pub async fn list_plays(State(state): State<AppState>) -> Result<Json<Vec<Play>>, AppError> {
    let plays = state.play_repo.list_plays().await?;

    tracing::debug!(count = plays.len(), "Listed plays");

    Ok(Json(plays))
}

/// Get a single play by ID (GET /api/plays/{id}).
pub async fn get_play(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Play>, AppError> {
    let play = state
        .play_repo
        .get_play(&id)
        .await?
        .ok_or_else(|| RepositoryError::play_not_found(&id))?;

    Ok(Json(play))
}

/// Delete a play by ID (DELETE /api/plays/{id}).
///
/// Succeeds whether or not the play existed.
pub async fn delete_play(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    tracing::debug!(play_id = %id, "Received delete play request");

    state.play_repo.delete_play(&id).await?;

    tracing::info!(play_id = %id, "Deleted play");

    Ok(StatusCode::NO_CONTENT)
}
