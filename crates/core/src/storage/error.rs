use thiserror::Error;

/// Failures reported by a backing store primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store not configured: missing {0}")]
    NotConfigured(String),
    #[error("Conditional check failed: item does not exist")]
    ConditionalCheckFailed,
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Throttled: {0}")]
    Throttled(String),
    #[error("Rejected by store: {0}")]
    Validation(String),
    #[error("Deadline exceeded")]
    DeadlineExceeded,
    #[error("Store request failed: {0}")]
    Backend(String),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("failed to query {collection}")]
    QueryFailed { collection: &'static str },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// True when the error means the addressed item does not exist.
    ///
    /// Covers both a lookup that found nothing and a conditional write that
    /// was rejected because the key is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::NotFound { .. }
                | RepositoryError::Store(StoreError::ConditionalCheckFailed)
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Contract",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "Contract not found: abc-123");
    }

    #[test]
    fn test_query_failed_display_hides_cause() {
        let error = RepositoryError::QueryFailed {
            collection: "tariffs",
        };
        assert_eq!(error.to_string(), "failed to query tariffs");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let error = RepositoryError::from(StoreError::Throttled("slow down".to_string()));
        assert_eq!(error.to_string(), "Throttled: slow down");
    }

    #[test]
    fn test_not_configured_display() {
        let error = StoreError::NotConfigured("DYNAMODB_TABLE_NAME".to_string());
        assert_eq!(
            error.to_string(),
            "Store not configured: missing DYNAMODB_TABLE_NAME"
        );
    }

    #[test]
    fn test_is_not_found_by_kind() {
        let not_found = RepositoryError::NotFound {
            entity_type: "Tariff",
            id: "t".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(RepositoryError::Store(StoreError::ConditionalCheckFailed).is_not_found());

        assert!(!RepositoryError::Decode("bad".to_string()).is_not_found());
        assert!(!RepositoryError::QueryFailed {
            collection: "providers"
        }
        .is_not_found());
        // A message that merely mentions "not found" is not a not-found error
        assert!(!RepositoryError::Store(StoreError::TableNotFound("t".to_string())).is_not_found());
    }
}
