//! Todo service: the orchestration layer between callers, the cache and the
//! backing store.
//!
//! The cache strategy is fixed when the service is built. Point reads and
//! mutations dispatch through the matching [`CachePolicy`]; creation and
//! listing always go straight to the store.

mod cache_aside;
mod error;
mod passthrough;
mod policy;
#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::TryStreamExt;
use uuid::Uuid;

use taskcache_core::cache::{Cache, CacheStrategy, TypedCache};
use taskcache_core::storage::{ItemUpdate, TodoStore};
use taskcache_core::todo::{ItemCodec, Todo, UpdateTodo};

use crate::background::BackgroundTasks;

pub use error::{Result, ServiceError};
pub use policy::{policy_for, CachePolicy};

/// Construction-time options for [`TodoService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub cache_strategy: CacheStrategy,
    /// TTL for cached todos.
    pub cache_ttl: Duration,
    /// Upper bound on a single background cache fill.
    pub populate_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_strategy: CacheStrategy::CacheAside,
            cache_ttl: Duration::from_secs(300),
            populate_timeout: Duration::from_secs(2),
        }
    }
}

/// Parses a caller-supplied identifier.
pub fn parse_todo_id(field: &'static str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|e| ServiceError::Validation(format!("{field} is not a valid UUID: {e}")))
}

/// Todo operations fronted by a cache policy.
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    policy: Box<dyn CachePolicy>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, cache: Arc<dyn Cache>, config: ServiceConfig) -> Self {
        let policy = policy_for(
            config.cache_strategy,
            Arc::clone(&store),
            TypedCache::new(cache, config.cache_ttl),
            BackgroundTasks::new(config.populate_timeout),
        );

        tracing::debug!(
            strategy = %config.cache_strategy,
            ttl_secs = config.cache_ttl.as_secs(),
            "Todo service ready"
        );

        Self { store, policy }
    }

    pub fn strategy(&self) -> CacheStrategy {
        self.policy.strategy()
    }

    /// Creates a new todo owned by `user_id`. Always written straight to the store.
    pub async fn create(&self, user_id: Uuid, title: &str, description: &str) -> Result<Todo> {
        let todo = Todo::new(user_id, title, description);
        self.store.put_item(todo.to_item()).await?;
        tracing::debug!(todo_id = %todo.id, %user_id, "Created todo");

        Ok(todo)
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Todo> {
        self.policy.find_by_id(user_id, id).await
    }

    /// Lists every todo owned by `user_id`, bypassing the cache.
    ///
    /// Fails on the first item that does not decode.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Todo>> {
        let mut items = self.store.query_by_owner(user_id).await?;

        let mut todos = Vec::new();
        while let Some(item) = items.try_next().await? {
            todos.push(Todo::from_item(&item)?);
        }

        tracing::trace!(%user_id, count = todos.len(), "Listed todos");
        Ok(todos)
    }

    /// Replaces title and description and sets or clears completion.
    pub async fn update(&self, user_id: Uuid, id: Uuid, params: &UpdateTodo) -> Result<()> {
        let update = ItemUpdate::from_request(params, Utc::now());
        self.policy.update(user_id, id, &update).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.policy.delete(user_id, id).await
    }
}
