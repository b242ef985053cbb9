//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `ConnectionFailed` -> 500 (Internal Server Error)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
///
/// A store that cannot be reached is reported the same way as any other
/// store fault; callers only distinguish "missing" from "broken".
///
/// # Examples
///
/// ```
/// use squiggle_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::play_not_found("abc-123");
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::ConnectionFailed(_) => 500,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
    }
}
