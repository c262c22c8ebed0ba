use std::{marker::PhantomData, sync::Arc, time::Duration};

use serde::{de::DeserializeOwned, Serialize};

use super::{deserialize_value, serialize_value, Cache, Result};

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

impl<T> CacheLookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss => None,
        }
    }
}

/// A byte cache bound to a single entity type.
///
/// Values are stored as JSON. A stored value that no longer deserializes is
/// reported as an error rather than a miss, so callers never silently fall
/// back to the store on corrupted cache data.
pub struct TypedCache<T, C: ?Sized> {
    cache: Arc<C>,
    ttl: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<T, C: ?Sized> Clone for TypedCache<T, C> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
            _entity: PhantomData,
        }
    }
}

impl<T, C> TypedCache<T, C>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    C: Cache + ?Sized,
{
    /// Creates a typed view over `cache` writing entries with `ttl`.
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            _entity: PhantomData,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reads and decodes the value stored under `key`.
    pub async fn read(&self, key: &str) -> Result<CacheLookup<T>> {
        match self.cache.get(key).await? {
            Some(bytes) => Ok(CacheLookup::Hit(deserialize_value(&bytes)?)),
            None => Ok(CacheLookup::Miss),
        }
    }

    /// Writes `value` under `key`, replacing whatever was there.
    pub async fn write(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serialize_value(value)?;
        self.cache.set(key, &bytes, self.ttl).await
    }

    /// Removes `key`. Absent keys are not an error.
    pub async fn invalidate(&self, key: &str) -> Result<()> {
        self.cache.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, (Vec<u8>, Duration)>>,
    }

    #[async_trait]
    impl Cache for MapCache {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.entries.lock().await.get(key).map(|(v, _)| v.clone()))
        }

        async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), (value.to_vec(), ttl));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.entries.lock().await.remove(key);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct Note {
        text: String,
    }

    fn note(text: &str) -> Note {
        Note {
            text: text.to_string(),
        }
    }

    fn typed(cache: &Arc<MapCache>) -> TypedCache<Note, MapCache> {
        TypedCache::new(Arc::clone(cache), Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_read_missing_is_miss() {
        let cache = typed(&Arc::new(MapCache::default()));
        assert_eq!(cache.read("nope").await.unwrap(), CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_write_then_read_hits() {
        let cache = typed(&Arc::new(MapCache::default()));

        cache.write("k", &note("hello")).await.unwrap();

        assert_eq!(
            cache.read("k").await.unwrap(),
            CacheLookup::Hit(note("hello"))
        );
    }

    #[tokio::test]
    async fn test_write_overwrites_and_uses_ttl() {
        let raw = Arc::new(MapCache::default());
        let cache = typed(&raw);

        cache.write("k", &note("one")).await.unwrap();
        cache.write("k", &note("two")).await.unwrap();

        assert_eq!(cache.read("k").await.unwrap().into_option(), Some(note("two")));
        let entries = raw.entries.lock().await;
        assert_eq!(entries.get("k").unwrap().1, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_invalidate_removes_and_tolerates_absence() {
        let cache = typed(&Arc::new(MapCache::default()));
        cache.write("k", &note("hello")).await.unwrap();

        cache.invalidate("k").await.unwrap();
        cache.invalidate("k").await.unwrap();

        assert_eq!(cache.read("k").await.unwrap(), CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_an_error_not_a_miss() {
        let raw = Arc::new(MapCache::default());
        raw.set("k", b"{ not json", Duration::from_secs(1))
            .await
            .unwrap();

        let result = typed(&raw).read("k").await;

        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_works_over_trait_object() {
        let raw: Arc<dyn Cache> = Arc::new(MapCache::default());
        let cache: TypedCache<Note, dyn Cache> = TypedCache::new(raw, Duration::from_secs(5));

        cache.write("k", &note("dyn")).await.unwrap();

        assert_eq!(cache.read("k").await.unwrap(), CacheLookup::Hit(note("dyn")));
        assert_eq!(cache.ttl(), Duration::from_secs(5));
    }
}
