use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use taskcache_core::cache::{Cache, CacheStrategy, TypedCache};
use taskcache_core::storage::{ItemUpdate, TodoStore};
use taskcache_core::todo::{ItemCodec, Todo};

use crate::background::BackgroundTasks;

use super::cache_aside::CacheAside;
use super::passthrough::Passthrough;
use super::Result;

/// The strategy-dependent half of the service.
///
/// Create and list never consult the cache, so only point reads and
/// mutations go through a policy.
#[async_trait]
pub trait CachePolicy: Send + Sync {
    fn strategy(&self) -> CacheStrategy;

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Todo>;

    async fn update(&self, user_id: Uuid, id: Uuid, update: &ItemUpdate) -> Result<()>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()>;
}

/// Builds the policy for `strategy`.
pub fn policy_for(
    strategy: CacheStrategy,
    store: Arc<dyn TodoStore>,
    cache: TypedCache<Todo, dyn Cache>,
    background: BackgroundTasks,
) -> Box<dyn CachePolicy> {
    match strategy {
        CacheStrategy::CacheAside => Box::new(CacheAside::new(store, cache, background)),
        CacheStrategy::Unset
        | CacheStrategy::WriteThrough
        | CacheStrategy::WriteBack
        | CacheStrategy::ReadThrough
        | CacheStrategy::WriteAround => Box::new(Passthrough::new(strategy, store)),
    }
}

/// Reads and decodes a single todo straight from the store.
pub(super) async fn load_todo(store: &dyn TodoStore, user_id: Uuid, id: Uuid) -> Result<Todo> {
    let item = store.get_item(user_id, id).await?;
    Ok(Todo::from_item(&item)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{MockCache, MockStore};
    use crate::service::ServiceError;
    use std::time::Duration;
    use taskcache_core::todo::DecodeError;

    #[test]
    fn test_every_strategy_gets_a_policy_reporting_it() {
        for strategy in CacheStrategy::ALL {
            let store: Arc<dyn TodoStore> = Arc::new(MockStore::default());
            let cache: Arc<dyn Cache> = Arc::new(MockCache::default());
            let policy = policy_for(
                strategy,
                store,
                TypedCache::new(cache, Duration::from_secs(300)),
                BackgroundTasks::new(Duration::from_secs(1)),
            );

            assert_eq!(policy.strategy(), strategy);
        }
    }

    #[tokio::test]
    async fn test_load_todo_reports_decode_errors() {
        let store = MockStore::default();
        let todo = Todo::new(Uuid::new_v4(), "buy milk", "");
        let mut item = todo.to_item();
        item.remove("Title");
        store.insert_raw(todo.user_id, todo.id, item).await;

        let result = load_todo(&store, todo.user_id, todo.id).await;

        assert_eq!(
            result,
            Err(ServiceError::Decode(DecodeError::FieldMissing("Title")))
        );
    }
}
