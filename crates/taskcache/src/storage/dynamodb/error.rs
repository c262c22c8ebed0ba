//! DynamoDB error mapping.
//!
//! Every operation shares one classifier keyed on the service error code;
//! only `UpdateItem` has an operation-specific case.

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use taskcache_core::storage::RepositoryError;

/// Maps any DynamoDB SDK error for `operation` to a `RepositoryError`.
///
/// Requests that never reached the service become `ConnectionFailed`;
/// everything the service rejected becomes `QueryFailed`.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, operation: &'static str) -> RepositoryError
where
    E: ProvideErrorMetadata + Error + Send + Sync + 'static,
    R: Debug,
{
    match &err {
        SdkError::TimeoutError(_) => {
            return RepositoryError::ConnectionFailed(format!("{operation} timed out"));
        }
        SdkError::DispatchFailure(_) => {
            return RepositoryError::ConnectionFailed(format!(
                "{operation} could not be dispatched: {}",
                DisplayErrorContext(&err)
            ));
        }
        _ => {}
    }

    let reason = match err.code() {
        Some("ResourceNotFoundException") => "table not found".to_string(),
        Some(
            "ProvisionedThroughputExceededException"
            | "RequestLimitExceeded"
            | "ThrottlingException",
        ) => "throttled, please retry".to_string(),
        Some("TransactionConflictException") => "transaction conflict, please retry".to_string(),
        Some("ItemCollectionSizeLimitExceededException") => {
            "item collection size limit exceeded".to_string()
        }
        Some("InternalServerError") => "DynamoDB internal server error".to_string(),
        _ => DisplayErrorContext(&err).to_string(),
    };

    RepositoryError::QueryFailed(format!("{operation}: {reason}"))
}

/// Maps an `UpdateItem` error.
///
/// Updates are conditioned on the item existing, so a failed condition
/// means the todo is gone.
pub fn map_update_item_error<R: Debug>(
    err: SdkError<UpdateItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if err
        .as_service_error()
        .is_some_and(UpdateItemError::is_conditional_check_failed_exception)
    {
        return RepositoryError::NotFound {
            entity_type,
            id: id.into(),
        };
    }
    map_sdk_error(err, "UpdateItem")
}
