//! Error types for DynamoDB operations.

use thiserror::Error;

/// Result type alias for dynamodb module.
pub type Result<T> = std::result::Result<T, DynamodbError>;

/// Errors that can occur during DynamoDB operations.
#[derive(Error, Debug)]
pub enum DynamodbError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Table '{table_name}' has key schema {found}, expected {expected}")]
    KeySchemaMismatch {
        table_name: String,
        expected: String,
        found: String,
    },

    #[error("Table '{table_name}' is in status {status} and cannot be used")]
    TableUnusable { table_name: String, status: String },

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Timeout waiting for table '{table_name}' to become active")]
    TableActivationTimeout { table_name: String },

    #[error("Timeout waiting for table '{table_name}' to be deleted")]
    TableDeletionTimeout { table_name: String },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}
