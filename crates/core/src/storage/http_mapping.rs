//! Pure functions for mapping repository errors to HTTP status codes.

use super::{RepositoryError, StoreError};

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound`, `Store(ConditionalCheckFailed)` -> 404 (Not Found)
/// - `Store(NotConfigured)`, `Store(Throttled)` -> 503 (Service Unavailable)
/// - `Store(DeadlineExceeded)` -> 504 (Gateway Timeout)
/// - everything else -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use tariffs_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Tariff",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        e if e.is_not_found() => 404,
        RepositoryError::Store(StoreError::NotConfigured(_))
        | RepositoryError::Store(StoreError::Throttled(_)) => 503,
        RepositoryError::Store(StoreError::DeadlineExceeded) => 504,
        _ => 500,
    }
}
