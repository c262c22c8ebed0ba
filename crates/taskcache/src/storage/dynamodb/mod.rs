//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of `TodoStore`
//! using `aws-sdk-dynamodb`.

mod conversions;
mod error;
mod repository;

pub use repository::DynamoDbStore;
