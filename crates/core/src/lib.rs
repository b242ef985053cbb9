//! squiggle_core - Pure domain types and storage contracts for the squiggle play service.
//!
//! Nothing in this crate performs I/O. The server and client crates build on
//! these types so both sides of the wire agree on the JSON shape of a play.

pub mod play;
pub mod storage;
