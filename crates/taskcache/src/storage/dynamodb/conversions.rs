//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between SDK `AttributeValue` maps and the
//! storage-neutral `AttributeMap`, plus the update expression builder.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as DynamoValue;
use taskcache_core::storage::{AttributeMap, AttributeValue, ItemUpdate, RepositoryError};
use taskcache_core::todo::fields;
use uuid::Uuid;

/// A DynamoDB item as sent and received by the SDK.
pub type DynamoItem = HashMap<String, DynamoValue>;

// ============================================================================
// Keys
// ============================================================================

/// Primary key for a todo: partition `UserID`, sort `ID`.
pub fn item_key(user_id: Uuid, id: Uuid) -> DynamoItem {
    HashMap::from([
        (
            fields::USER_ID.to_string(),
            DynamoValue::S(user_id.to_string()),
        ),
        (fields::ID.to_string(), DynamoValue::S(id.to_string())),
    ])
}

// ============================================================================
// Value conversions
// ============================================================================

/// Convert a storage value to its SDK form.
///
/// Unsupported kinds only ever come from reads and cannot be written back.
pub fn value_to_dynamo(value: &AttributeValue) -> Result<DynamoValue, RepositoryError> {
    match value {
        AttributeValue::S(s) => Ok(DynamoValue::S(s.clone())),
        AttributeValue::N(n) => Ok(DynamoValue::N(n.clone())),
        AttributeValue::Bool(b) => Ok(DynamoValue::Bool(*b)),
        AttributeValue::Null => Ok(DynamoValue::Null(true)),
        AttributeValue::Unsupported(kind) => Err(RepositoryError::InvalidData(format!(
            "cannot write attribute of type {kind}"
        ))),
    }
}

/// Convert an SDK value to its storage form.
pub fn value_from_dynamo(value: &DynamoValue) -> AttributeValue {
    match value {
        DynamoValue::S(s) => AttributeValue::S(s.clone()),
        DynamoValue::N(n) => AttributeValue::N(n.clone()),
        DynamoValue::Bool(b) => AttributeValue::Bool(*b),
        DynamoValue::Null(_) => AttributeValue::Null,
        DynamoValue::B(_) => AttributeValue::Unsupported("B"),
        DynamoValue::Bs(_) => AttributeValue::Unsupported("BS"),
        DynamoValue::L(_) => AttributeValue::Unsupported("L"),
        DynamoValue::M(_) => AttributeValue::Unsupported("M"),
        DynamoValue::Ns(_) => AttributeValue::Unsupported("NS"),
        DynamoValue::Ss(_) => AttributeValue::Unsupported("SS"),
        _ => AttributeValue::Unsupported("UNKNOWN"),
    }
}

/// Convert a storage item to a DynamoDB item.
pub fn item_to_dynamo(item: &AttributeMap) -> Result<DynamoItem, RepositoryError> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), value_to_dynamo(value)?)))
        .collect()
}

/// Convert a DynamoDB item to a storage item.
pub fn item_from_dynamo(item: &DynamoItem) -> AttributeMap {
    item.iter()
        .map(|(name, value)| (name.clone(), value_from_dynamo(value)))
        .collect()
}

// ============================================================================
// Update expressions
// ============================================================================

/// A rendered `UpdateItem` expression with its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: DynamoItem,
}

/// Render an `ItemUpdate` as `SET ... [REMOVE ...]`.
///
/// Every attribute goes through a `#name` placeholder so reserved words
/// never collide.
pub fn update_expression(update: &ItemUpdate) -> Result<UpdateExpression, RepositoryError> {
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    let mut assignments = Vec::new();
    for (field, value) in update.set_attributes() {
        let name = format!("#{field}");
        let placeholder = format!(":{field}");
        assignments.push(format!("{name} = {placeholder}"));
        names.insert(name, field.to_string());
        values.insert(placeholder, value_to_dynamo(&value)?);
    }

    let removals: Vec<String> = update
        .removed_attributes()
        .into_iter()
        .map(|field| {
            let name = format!("#{field}");
            names.insert(name.clone(), field.to_string());
            name
        })
        .collect();

    let mut expression = format!("SET {}", assignments.join(", "));
    if !removals.is_empty() {
        expression.push_str(&format!(" REMOVE {}", removals.join(", ")));
    }

    Ok(UpdateExpression {
        expression,
        names,
        values,
    })
}
