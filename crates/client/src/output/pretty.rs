//! Pretty output formatting.

use squiggle_core::play::{BallState, Play, PlayerState};

/// Format a play for display, including every player sample.
pub fn format_play(play: &Play) -> String {
    let mut output = format_play_summary(play);
    for state in &play.player_states {
        output.push_str(&format!("\n    {}", format_player_state(state)));
    }
    output
}

/// Format a play header without its samples.
pub fn format_play_summary(play: &Play) -> String {
    format!(
        "{}\n  ID: {}\n  Created: {}\n  Samples: {}",
        display_name(&play.name),
        play.id,
        play.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        play.player_states.len()
    )
}

/// Format plays for display.
pub fn format_plays(plays: &[Play]) -> String {
    if plays.is_empty() {
        return "No plays found.".to_string();
    }
    let mut output = format!("PLAYS ({})\n", plays.len());
    output.push_str(&"-".repeat(40));
    for play in plays {
        output.push_str(&format!("\n{}", format_play_summary(play)));
        output.push('\n');
    }
    output
}

fn format_player_state(state: &PlayerState) -> String {
    let mut output = format!(
        "t={} {} @ ({}, {})",
        state.timestamp, state.player_id, state.position.x, state.position.y
    );
    if let Some(ball) = &state.ball_state {
        output.push_str(&format!(" {}", format_ball(ball)));
    }
    output
}

fn format_ball(ball: &BallState) -> String {
    match &ball.attached_to {
        Some(attachment) => format!(
            "ball @ ({}, {}) on {} {}",
            ball.position.x,
            ball.position.y,
            attachment.kind.as_str(),
            attachment.id
        ),
        None => format!("ball @ ({}, {})", ball.position.x, ball.position.y),
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}
