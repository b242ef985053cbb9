//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `squiggle_core::storage`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use squiggle_core::storage::RepositoryError;

/// Requests that never reached DynamoDB are connection failures regardless
/// of the operation.
fn dispatch_failure<E, R>(err: &SdkError<E, R>) -> Option<RepositoryError> {
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            Some(RepositoryError::ConnectionFailed(err.to_string()))
        }
        _ => None,
    }
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> RepositoryError {
    if let Some(failure) = dispatch_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            RepositoryError::QueryFailed("Table not found".to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            RepositoryError::QueryFailed("Throughput exceeded".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            RepositoryError::QueryFailed("Request limit exceeded".to_string())
        }
        GetItemError::InternalServerError(_) => {
            RepositoryError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => RepositoryError::QueryFailed(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> RepositoryError {
    if let Some(failure) = dispatch_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => {
            RepositoryError::QueryFailed("Table not found".to_string())
        }
        ScanError::ProvisionedThroughputExceededException(_) => {
            RepositoryError::QueryFailed("Throughput exceeded".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            RepositoryError::QueryFailed("Request limit exceeded".to_string())
        }
        ScanError::InternalServerError(_) => {
            RepositoryError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => RepositoryError::QueryFailed(format!("Scan failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> RepositoryError {
    if let Some(failure) = dispatch_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            RepositoryError::QueryFailed("Table not found".to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            RepositoryError::QueryFailed("Throughput exceeded".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            RepositoryError::QueryFailed("Request limit exceeded".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            RepositoryError::QueryFailed("Transaction conflict".to_string())
        }
        PutItemError::InternalServerError(_) => {
            RepositoryError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => RepositoryError::QueryFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> RepositoryError {
    if let Some(failure) = dispatch_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => {
            RepositoryError::QueryFailed("Table not found".to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            RepositoryError::QueryFailed("Throughput exceeded".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            RepositoryError::QueryFailed("Request limit exceeded".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            RepositoryError::QueryFailed("Transaction conflict".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            RepositoryError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => RepositoryError::QueryFailed(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a DescribeTable SDK error (startup check) to RepositoryError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = dispatch_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => {
            RepositoryError::QueryFailed(format!("Table not found: {table_name}"))
        }
        DescribeTableError::InternalServerError(_) => {
            RepositoryError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => RepositoryError::ConnectionFailed(format!("DescribeTable failed: {:?}", err)),
    }
}
