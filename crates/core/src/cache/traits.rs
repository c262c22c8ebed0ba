use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations over raw bytes.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache, overwriting any existing value.
    ///
    /// A zero `ttl` stores the value without expiry.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Deletes a value from the cache by key. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
