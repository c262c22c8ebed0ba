//! Redis cache implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use taskcache_core::cache::{Cache, Result};

use super::error::map_redis_error;

/// Redis cache backend using connection manager for pooling.
#[derive(Clone)]
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();

        if ttl.is_zero() {
            conn.set::<_, _, ()>(key, value)
                .await
                .map_err(map_redis_error)?;
        } else {
            // SET EX has whole-second resolution
            let seconds = ttl.as_secs().max(1);
            conn.set_ex::<_, _, ()>(key, value, seconds)
                .await
                .map_err(map_redis_error)?;
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Connects to `REDIS_URL`, or returns `None` so the test can skip.
    async fn connect() -> Option<(RedisCache, String)> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        match RedisCache::new(&url).await {
            Ok(cache) => Some((cache, format!("taskcache-test:{}", Uuid::new_v4()))),
            Err(err) => {
                eprintln!("Skipping test: Redis not available ({err})");
                None
            }
        }
    }

    #[tokio::test]
    async fn test_redis_set_get_delete() {
        let Some((cache, key)) = connect().await else {
            return;
        };

        assert_eq!(cache.get(&key).await.unwrap(), None);

        cache.set(&key, b"first", Duration::from_secs(60)).await.unwrap();
        cache.set(&key, b"second", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"second".to_vec()));

        cache.delete(&key).await.unwrap();
        cache.delete(&key).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_sub_second_ttl_rounds_up() {
        let Some((cache, key)) = connect().await else {
            return;
        };

        cache.set(&key, b"brief", Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_zero_ttl_persists() {
        let Some((cache, key)) = connect().await else {
            return;
        };

        cache.set(&key, b"forever", Duration::ZERO).await.unwrap();
        let mut conn = cache.conn.clone();
        let ttl: i64 = redis::cmd("TTL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .unwrap();
        assert_eq!(ttl, -1);

        cache.delete(&key).await.unwrap();
    }
}
