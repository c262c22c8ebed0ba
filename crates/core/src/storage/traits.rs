use async_trait::async_trait;
use futures_util::stream::BoxStream;
use uuid::Uuid;

use super::{AttributeMap, ItemUpdate, Result};

/// Lazily produced items from an owner query.
pub type ItemStream = BoxStream<'static, Result<AttributeMap>>;

/// Authoritative per-item store keyed by (UserID, ID).
///
/// Works on raw attribute maps; decoding into domain types happens above
/// this layer.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Gets a single item. Returns `NotFound` if absent.
    async fn get_item(&self, user_id: Uuid, id: Uuid) -> Result<AttributeMap>;

    /// Writes an item, replacing any existing item with the same key.
    async fn put_item(&self, item: AttributeMap) -> Result<()>;

    /// Applies a partial update to an existing item.
    ///
    /// Returns `NotFound` if the item does not exist; never creates one.
    async fn update_item(&self, user_id: Uuid, id: Uuid, update: &ItemUpdate) -> Result<()>;

    /// Streams every item owned by `user_id`.
    ///
    /// Backends that page internally follow every page; no cursor is
    /// surfaced to callers.
    async fn query_by_owner(&self, user_id: Uuid) -> Result<ItemStream>;

    /// Deletes an item. Deleting an absent item succeeds.
    async fn delete_item(&self, user_id: Uuid, id: Uuid) -> Result<()>;
}
