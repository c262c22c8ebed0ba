//! DynamoDB store implementation.
//!
//! Implements `TodoStore` from `taskcache_core::storage` using DynamoDB. The
//! table is keyed by partition key `UserID` and sort key `ID`.

use std::future::Future;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use futures_util::stream::{self, StreamExt};
use uuid::Uuid;

use taskcache_core::storage::{
    AttributeMap, ItemStream, ItemUpdate, RepositoryError, Result, TodoStore,
};
use taskcache_core::todo::fields;

use super::conversions::{
    item_from_dynamo, item_key, item_to_dynamo, update_expression, DynamoItem,
};
use super::error::{map_sdk_error, map_update_item_error};

/// DynamoDB-based todo store.
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a store using the AWS SDK default credential chain.
    ///
    /// `endpoint` overrides the service endpoint, e.g. for DynamoDB Local.
    pub async fn connect(table_name: impl Into<String>, endpoint: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        Self::new(Client::new(&config), table_name)
    }
}

#[async_trait]
impl TodoStore for DynamoDbStore {
    async fn get_item(&self, user_id: Uuid, id: Uuid) -> Result<AttributeMap> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(item_key(user_id, id)))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "GetItem"))?;

        match result.item {
            Some(item) => Ok(item_from_dynamo(&item)),
            None => Err(RepositoryError::NotFound {
                entity_type: "Todo",
                id: id.to_string(),
            }),
        }
    }

    async fn put_item(&self, item: AttributeMap) -> Result<()> {
        let item = item_to_dynamo(&item)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "PutItem"))?;

        Ok(())
    }

    async fn update_item(&self, user_id: Uuid, id: Uuid, update: &ItemUpdate) -> Result<()> {
        let rendered = update_expression(update)?;

        self.client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(item_key(user_id, id)))
            .update_expression(rendered.expression)
            .set_expression_attribute_names(Some(rendered.names))
            .set_expression_attribute_values(Some(rendered.values))
            .expression_attribute_names("#ID", fields::ID)
            .condition_expression("attribute_exists(#ID)")
            .send()
            .await
            .map_err(|e| map_update_item_error(e, "Todo", id.to_string()))?;

        Ok(())
    }

    async fn query_by_owner(&self, user_id: Uuid) -> Result<ItemStream> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let owner = AttributeValue::S(user_id.to_string());

        Ok(query_pages(move |start| {
            let request = client
                .query()
                .table_name(&table_name)
                .key_condition_expression("#owner = :owner")
                .expression_attribute_names("#owner", fields::USER_ID)
                .expression_attribute_values(":owner", owner.clone())
                .set_exclusive_start_key(start);

            async move {
                let output = request
                    .send()
                    .await
                    .map_err(|e| map_sdk_error(e, "Query"))?;
                Ok((output.items.unwrap_or_default(), output.last_evaluated_key))
            }
        }))
    }

    async fn delete_item(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(item_key(user_id, id)))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "DeleteItem"))?;

        Ok(())
    }
}

/// Streams every item of a paged query, following `LastEvaluatedKey` until
/// the backend stops returning a non-empty one.
///
/// `fetch` receives the exclusive start key (`None` for the first page) and
/// yields that page's items plus the key to continue from. A failed page
/// ends the stream after its error.
fn query_pages<F, Fut>(fetch: F) -> ItemStream
where
    F: Fn(Option<DynamoItem>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(Vec<DynamoItem>, Option<DynamoItem>)>> + Send + 'static,
{
    stream::unfold(Some((fetch, None)), |state| async move {
        let (fetch, start) = state?;
        match fetch(start).await {
            Ok((items, next)) => {
                let page: Vec<Result<AttributeMap>> =
                    items.iter().map(|item| Ok(item_from_dynamo(item))).collect();
                let state = next
                    .filter(|key| !key.is_empty())
                    .map(|key| (fetch, Some(key)));
                Some((page, state))
            }
            Err(err) => Some((vec![Err(err)], None)),
        }
    })
    .flat_map(stream::iter)
    .boxed()
}
