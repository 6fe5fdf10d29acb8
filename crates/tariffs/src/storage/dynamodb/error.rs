//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `tariffs_core::storage`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use tariffs_core::storage::StoreError;

const THROUGHPUT_EXCEEDED: &str = "Throughput exceeded, please retry";
const REQUEST_LIMIT_EXCEEDED: &str = "Request limit exceeded, please retry";

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        GetItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        err => unhandled("GetItem", err),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::ConditionalCheckFailed,
        PutItemError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        err => unhandled("PutItem", err),
    }
}

/// Map an UpdateItem SDK error to StoreError.
///
/// A failed `attribute_exists` condition becomes
/// [`StoreError::ConditionalCheckFailed`].
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => StoreError::ConditionalCheckFailed,
        UpdateItemError::ResourceNotFoundException(_) => {
            StoreError::TableNotFound(table.to_string())
        }
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        err => unhandled("UpdateItem", err),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => StoreError::ConditionalCheckFailed,
        DeleteItemError::ResourceNotFoundException(_) => {
            StoreError::TableNotFound(table.to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        err => unhandled("DeleteItem", err),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled(THROUGHPUT_EXCEEDED.to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::Throttled(REQUEST_LIMIT_EXCEEDED.to_string())
        }
        err => unhandled("Query", err),
    }
}

/// Errors without a dedicated variant. `ValidationException` is not modelled
/// by the SDK and is recognised by its error code.
fn unhandled<E: ProvideErrorMetadata + Debug>(operation: &str, err: E) -> StoreError {
    match err.code() {
        Some("ValidationException") => {
            StoreError::Validation(err.message().unwrap_or("invalid request").to_string())
        }
        _ => StoreError::Backend(format!("{operation} failed: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ProvisionedThroughputExceededException,
        ResourceNotFoundException,
    };

    fn service_error<E>(err: E) -> SdkError<E, ()> {
        SdkError::service_error(err, ())
    }

    #[test]
    fn test_update_conditional_check_failed() {
        let err = service_error(UpdateItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder().build(),
        ));

        assert_eq!(
            map_update_item_error(err, "tariffs"),
            StoreError::ConditionalCheckFailed
        );
    }

    #[test]
    fn test_missing_table() {
        let err = service_error(QueryError::ResourceNotFoundException(
            ResourceNotFoundException::builder().build(),
        ));

        assert_eq!(
            map_query_error(err, "tariffs"),
            StoreError::TableNotFound("tariffs".to_string())
        );
    }

    #[test]
    fn test_throughput_exceeded_is_throttled() {
        let err = service_error(GetItemError::ProvisionedThroughputExceededException(
            ProvisionedThroughputExceededException::builder().build(),
        ));

        assert!(matches!(
            map_get_item_error(err, "tariffs"),
            StoreError::Throttled(_)
        ));
    }

    #[test]
    fn test_validation_exception_by_code() {
        let err = service_error(PutItemError::generic(
            ErrorMetadata::builder()
                .code("ValidationException")
                .message("One or more parameter values were invalid")
                .build(),
        ));

        assert_eq!(
            map_put_item_error(err, "tariffs"),
            StoreError::Validation("One or more parameter values were invalid".to_string())
        );
    }

    #[test]
    fn test_unknown_error_is_backend() {
        let err = service_error(DeleteItemError::generic(
            ErrorMetadata::builder().code("SomethingElse").build(),
        ));

        let mapped = map_delete_item_error(err, "tariffs");
        assert!(matches!(mapped, StoreError::Backend(msg) if msg.starts_with("DeleteItem failed")));
    }
}
