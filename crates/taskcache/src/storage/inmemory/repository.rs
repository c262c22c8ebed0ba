//! In-memory store implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tokio::sync::RwLock;
use uuid::Uuid;

use taskcache_core::storage::{
    AttributeMap, ItemStream, ItemUpdate, RepositoryError, Result, TodoStore,
};
use taskcache_core::todo::fields;

/// In-memory storage backend.
///
/// Holds raw attribute maps keyed like the DynamoDB table (owner, then id),
/// so items go through the same codec as in production. Data is not
/// persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: Arc<RwLock<BTreeMap<(Uuid, Uuid), AttributeMap>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reads the (UserID, ID) key out of an item.
fn item_key(item: &AttributeMap) -> Result<(Uuid, Uuid)> {
    let key_part = |name: &'static str| -> Result<Uuid> {
        let value = item
            .get(name)
            .and_then(|v| v.as_s())
            .ok_or_else(|| RepositoryError::InvalidData(format!("missing key attribute {name}")))?;
        Uuid::parse_str(value)
            .map_err(|e| RepositoryError::InvalidData(format!("key attribute {name}: {e}")))
    };
    Ok((key_part(fields::USER_ID)?, key_part(fields::ID)?))
}

fn not_found(id: Uuid) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: "Todo",
        id: id.to_string(),
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn get_item(&self, user_id: Uuid, id: Uuid) -> Result<AttributeMap> {
        let items = self.items.read().await;
        items.get(&(user_id, id)).cloned().ok_or_else(|| not_found(id))
    }

    async fn put_item(&self, item: AttributeMap) -> Result<()> {
        let key = item_key(&item)?;
        let mut items = self.items.write().await;
        items.insert(key, item);
        Ok(())
    }

    async fn update_item(&self, user_id: Uuid, id: Uuid, update: &ItemUpdate) -> Result<()> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&(user_id, id)).ok_or_else(|| not_found(id))?;
        update.apply(item);
        Ok(())
    }

    async fn query_by_owner(&self, user_id: Uuid) -> Result<ItemStream> {
        let items = self.items.read().await;
        let owned: Vec<AttributeMap> = items
            .range((user_id, Uuid::nil())..=(user_id, Uuid::from_u128(u128::MAX)))
            .map(|(_, item)| item.clone())
            .collect();
        Ok(stream::iter(owned).map(Ok).boxed())
    }

    async fn delete_item(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(&(user_id, id));
        Ok(())
    }
}
