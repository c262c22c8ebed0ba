//! Attribute-map conversion functions for todos.
//!
//! Pure functions for converting between storage attribute maps and [`Todo`].
//! Every timestamp is written as RFC 3339 UTC text with automatic sub-second
//! precision, which round-trips any `DateTime<Utc>` exactly. Items written by
//! older clients with numeric epoch timestamps decode as
//! [`DecodeError::TypeMismatch`].

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::storage::{AttributeMap, AttributeValue};

use super::{DecodeError, Todo};

/// Attribute names used at the storage boundary.
pub mod fields {
    pub const ID: &str = "ID";
    pub const USER_ID: &str = "UserID";
    pub const CREATED_AT: &str = "CreatedAt";
    pub const UPDATED_AT: &str = "UpdatedAt";
    pub const COMPLETED_AT: &str = "CompletedAt";
    pub const TITLE: &str = "Title";
    pub const DESCRIPTION: &str = "Description";
}

/// Binds an entity type to its attribute-map representation.
pub trait ItemCodec: Sized {
    /// Encodes the entity into a storage item.
    fn to_item(&self) -> AttributeMap;

    /// Decodes a storage item into the entity.
    fn from_item(item: &AttributeMap) -> Result<Self, DecodeError>;
}

impl ItemCodec for Todo {
    fn to_item(&self) -> AttributeMap {
        todo_to_item(self)
    }

    fn from_item(item: &AttributeMap) -> Result<Self, DecodeError> {
        item_to_todo(item)
    }
}

/// Renders a timestamp in the storage text format.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a timestamp written by [`format_timestamp`].
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DecodeError::DateParse {
            field,
            cause: e.to_string(),
        })
}

/// Convert a Todo to a storage item.
pub fn todo_to_item(todo: &Todo) -> AttributeMap {
    let mut item = AttributeMap::new();

    item.insert(fields::ID.to_string(), AttributeValue::S(todo.id.to_string()));
    item.insert(
        fields::USER_ID.to_string(),
        AttributeValue::S(todo.user_id.to_string()),
    );
    item.insert(
        fields::CREATED_AT.to_string(),
        AttributeValue::S(format_timestamp(&todo.created_at)),
    );
    item.insert(
        fields::TITLE.to_string(),
        AttributeValue::S(todo.title.clone()),
    );
    item.insert(
        fields::DESCRIPTION.to_string(),
        AttributeValue::S(todo.description.clone()),
    );

    if let Some(updated_at) = &todo.updated_at {
        item.insert(
            fields::UPDATED_AT.to_string(),
            AttributeValue::S(format_timestamp(updated_at)),
        );
    }
    if let Some(completed_at) = &todo.completed_at {
        item.insert(
            fields::COMPLETED_AT.to_string(),
            AttributeValue::S(format_timestamp(completed_at)),
        );
    }

    item
}

/// Convert a storage item to a Todo.
pub fn item_to_todo(item: &AttributeMap) -> Result<Todo, DecodeError> {
    Ok(Todo {
        id: get_uuid(item, fields::ID)?,
        user_id: get_uuid(item, fields::USER_ID)?,
        created_at: get_datetime(item, fields::CREATED_AT)?,
        updated_at: get_optional_datetime(item, fields::UPDATED_AT)?,
        completed_at: get_optional_datetime(item, fields::COMPLETED_AT)?,
        title: get_string(item, fields::TITLE)?.to_string(),
        description: get_string(item, fields::DESCRIPTION)?.to_string(),
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string<'a>(item: &'a AttributeMap, key: &'static str) -> Result<&'a str, DecodeError> {
    get_optional_string(item, key)?.ok_or(DecodeError::FieldMissing(key))
}

/// Get an optional string attribute. Present with another type is still an error.
fn get_optional_string<'a>(
    item: &'a AttributeMap,
    key: &'static str,
) -> Result<Option<&'a str>, DecodeError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_s()
            .map(Some)
            .ok_or(DecodeError::TypeMismatch(key)),
    }
}

/// Get a required UUID attribute.
fn get_uuid(item: &AttributeMap, key: &'static str) -> Result<Uuid, DecodeError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(s).map_err(|e| DecodeError::InvalidUuid {
        field: key,
        cause: e.to_string(),
    })
}

/// Get a required datetime attribute.
fn get_datetime(item: &AttributeMap, key: &'static str) -> Result<DateTime<Utc>, DecodeError> {
    parse_timestamp(key, get_string(item, key)?)
}

/// Get an optional datetime attribute.
fn get_optional_datetime(
    item: &AttributeMap,
    key: &'static str,
) -> Result<Option<DateTime<Utc>>, DecodeError> {
    get_optional_string(item, key)?
        .map(|s| parse_timestamp(key, s))
        .transpose()
}
