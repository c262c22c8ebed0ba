//! Cache-aside policy.
//!
//! - **Reads**: check the cache first; on a miss, load from the store,
//!   return immediately and fill the cache in the background.
//! - **Writes**: persist to the store, then invalidate the cached entry.
//!   A failed invalidation is logged and never fails the write.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use taskcache_core::cache::{todo_key, Cache, CacheLookup, CacheStrategy, TypedCache};
use taskcache_core::storage::{ItemUpdate, TodoStore};
use taskcache_core::todo::Todo;

use crate::background::BackgroundTasks;

use super::policy::{load_todo, CachePolicy};
use super::{Result, ServiceError};

pub struct CacheAside {
    store: Arc<dyn TodoStore>,
    cache: TypedCache<Todo, dyn Cache>,
    background: BackgroundTasks,
}

impl CacheAside {
    pub fn new(
        store: Arc<dyn TodoStore>,
        cache: TypedCache<Todo, dyn Cache>,
        background: BackgroundTasks,
    ) -> Self {
        Self {
            store,
            cache,
            background,
        }
    }

    /// Writes `todo` into the cache without blocking the caller.
    ///
    /// A fill that lands after a concurrent update or delete has invalidated
    /// the key caches the old record until its TTL expires.
    fn populate(&self, todo: Todo) {
        let cache = self.cache.clone();
        let key = todo_key(todo.id);

        self.background.spawn("populate_todo_cache", async move {
            cache.write(&key, &todo).await
        });
    }

    async fn invalidate(&self, id: Uuid) {
        if let Err(err) = self.cache.invalidate(&todo_key(id)).await {
            tracing::warn!(todo_id = %id, error = %err, "Failed to invalidate todo cache");
        }
    }
}

#[async_trait]
impl CachePolicy for CacheAside {
    fn strategy(&self) -> CacheStrategy {
        CacheStrategy::CacheAside
    }

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Todo> {
        match self.cache.read(&todo_key(id)).await? {
            CacheLookup::Hit(todo) if todo.user_id == user_id => {
                tracing::trace!(todo_id = %id, "Cache hit for todo");
                return Ok(todo);
            }
            CacheLookup::Hit(_) => {
                // Keys are not owner-scoped; answer like the store would.
                tracing::debug!(todo_id = %id, %user_id, "Cached todo belongs to another owner");
                return Err(ServiceError::not_found(id));
            }
            CacheLookup::Miss => {}
        }

        tracing::trace!(todo_id = %id, "Cache miss for todo");
        let todo = load_todo(self.store.as_ref(), user_id, id).await?;
        self.populate(todo.clone());

        Ok(todo)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, update: &ItemUpdate) -> Result<()> {
        self.store.update_item(user_id, id, update).await?;
        tracing::debug!(todo_id = %id, "Updated todo");

        self.invalidate(id).await;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.store.delete_item(user_id, id).await?;
        tracing::debug!(todo_id = %id, "Deleted todo");

        self.invalidate(id).await;
        Ok(())
    }
}
