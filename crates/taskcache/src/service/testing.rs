//! Test doubles shared by the service and policy tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tokio::sync::{Notify, RwLock};
use uuid::Uuid;

use taskcache_core::cache::{Cache, CacheError, Result as CacheResult};
use taskcache_core::storage::{
    AttributeMap, ItemStream, ItemUpdate, RepositoryError, Result, TodoStore,
};
use taskcache_core::todo::{todo_to_item, Todo};

// ============================================================================
// Store
// ============================================================================

/// Store double that counts calls and can be switched into an outage.
#[derive(Default)]
pub struct MockStore {
    items: RwLock<HashMap<(Uuid, Uuid), AttributeMap>>,
    unavailable: AtomicBool,
    pub get_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl MockStore {
    pub async fn insert(&self, todo: &Todo) {
        self.insert_raw(todo.user_id, todo.id, todo_to_item(todo)).await;
    }

    /// Stores an arbitrary item, e.g. one that no longer decodes.
    pub async fn insert_raw(&self, user_id: Uuid, id: Uuid, item: AttributeMap) {
        self.items.write().await.insert((user_id, id), item);
    }

    pub async fn raw(&self, user_id: Uuid, id: Uuid) -> Option<AttributeMap> {
        self.items.read().await.get(&(user_id, id)).cloned()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn gets(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepositoryError::ConnectionFailed("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

fn missing(id: Uuid) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: "Todo",
        id: id.to_string(),
    }
}

#[async_trait]
impl TodoStore for MockStore {
    async fn get_item(&self, user_id: Uuid, id: Uuid) -> Result<AttributeMap> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.raw(user_id, id).await.ok_or_else(|| missing(id))
    }

    async fn put_item(&self, item: AttributeMap) -> Result<()> {
        self.check_available()?;
        let key_part = |name: &str| {
            item.get(name)
                .and_then(|v| v.as_s())
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| RepositoryError::InvalidData(format!("missing {name}")))
        };
        let key = (key_part("UserID")?, key_part("ID")?);
        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn update_item(&self, user_id: Uuid, id: Uuid, update: &ItemUpdate) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut items = self.items.write().await;
        let item = items.get_mut(&(user_id, id)).ok_or_else(|| missing(id))?;
        update.apply(item);
        Ok(())
    }

    async fn query_by_owner(&self, user_id: Uuid) -> Result<ItemStream> {
        self.check_available()?;
        let items = self.items.read().await;
        let mut owned: Vec<(Uuid, AttributeMap)> = items
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .map(|((_, id), item)| (*id, item.clone()))
            .collect();
        owned.sort_by_key(|(id, _)| *id);
        Ok(stream::iter(owned).map(|(_, item)| Ok(item)).boxed())
    }

    async fn delete_item(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.items.write().await.remove(&(user_id, id));
        Ok(())
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Cache double with per-operation failure switches.
#[derive(Default)]
pub struct MockCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    pub last_ttl: RwLock<Option<Duration>>,
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
    pub fail_delete: AtomicBool,
    pub get_calls: AtomicUsize,
    pub set_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    /// Holds every `set` back by this long before it lands.
    pub set_delay: RwLock<Option<Duration>>,
    written: Notify,
}

impl MockCache {
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn put_raw(&self, key: &str, value: &[u8]) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
    }

    /// Waits until the next successful `set`, or panics after a second.
    pub async fn wait_for_write(&self) {
        tokio::time::timeout(Duration::from_secs(1), self.written.notified())
            .await
            .expect("cache was never written");
    }

    pub fn calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
            + self.set_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
    }
}

fn outage() -> CacheError {
    CacheError::ConnectionFailed("cache offline".to_string())
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(outage());
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(outage());
        }
        let delay = *self.set_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.put_raw(key, value).await;
        *self.last_ttl.write().await = Some(ttl);
        self.written.notify_one();
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(outage());
        }
        self.entries.write().await.remove(key);
        Ok(())
    }
}
