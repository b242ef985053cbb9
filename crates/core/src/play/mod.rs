mod requests;
mod types;

pub use requests::CreatePlayRequest;
pub use types::{AttachmentKind, BallAttachment, BallState, Play, PlayerState, Position};
