use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use taskcache_core::cache::CacheStrategy;
use taskcache_core::storage::{ItemUpdate, TodoStore};
use taskcache_core::todo::Todo;

use super::policy::{load_todo, CachePolicy};
use super::Result;

/// Store-only policy for strategies without a cache implementation.
///
/// Reads and writes go straight to the store; the cache is never touched.
pub struct Passthrough {
    strategy: CacheStrategy,
    store: Arc<dyn TodoStore>,
}

impl Passthrough {
    pub fn new(strategy: CacheStrategy, store: Arc<dyn TodoStore>) -> Self {
        Self { strategy, store }
    }
}

#[async_trait]
impl CachePolicy for Passthrough {
    fn strategy(&self) -> CacheStrategy {
        self.strategy
    }

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Todo> {
        load_todo(self.store.as_ref(), user_id, id).await
    }

    async fn update(&self, user_id: Uuid, id: Uuid, update: &ItemUpdate) -> Result<()> {
        self.store.update_item(user_id, id, update).await?;
        tracing::debug!(todo_id = %id, strategy = %self.strategy, "Updated todo");
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.store.delete_item(user_id, id).await?;
        tracing::debug!(todo_id = %id, strategy = %self.strategy, "Deleted todo");
        Ok(())
    }
}
