//! Storage backend implementations.
//!
//! This module provides concrete implementations of `PlayRepository` from
//! `squiggle_core::storage`. The backend used by the server is selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): AWS DynamoDB storage backend using `aws-sdk-dynamodb`
//! - `inmemory`: process-local storage, no external dependencies
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with DynamoDB (default):
//! ```bash
//! cargo build -p squiggle
//! ```
//!
//! Build with in-memory storage:
//! ```bash
//! cargo build -p squiggle --no-default-features --features inmemory
//! ```

#[cfg(all(feature = "dynamodb", feature = "inmemory"))]
compile_error!(
    "Features 'dynamodb' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "dynamodb", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'dynamodb' or 'inmemory' feature. \
    Example: cargo build -p squiggle --features dynamodb"
);

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

// The router tests run against the in-memory backend whatever the feature set.
#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryRepository;
