//! In-memory storage backend.
//!
//! Stores plays in a `HashMap` wrapped in `Arc<RwLock<_>>`. Useful for tests
//! and for running the server without a DynamoDB endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use squiggle::storage::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! // Use repo for testing...
//! ```

mod repository;

pub use repository::InMemoryRepository;
