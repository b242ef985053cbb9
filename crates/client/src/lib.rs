//! squiggle_client - CLI client for the squiggle play API.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;

pub use client::SquiggleClient;
pub use error::{ClientError, Result};
