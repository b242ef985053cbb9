//! DynamoDB storage backend implementation.
//!
//! Plays live in a single table keyed by `id` (string hash key, no range
//! key). Each item mirrors the play's JSON shape, with nested maps and
//! lists for positions and player samples.

mod conversions;
mod error;
mod repository;

pub use repository::DynamoDbRepository;
