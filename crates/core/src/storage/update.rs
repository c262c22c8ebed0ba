use chrono::{DateTime, Utc};

use crate::todo::{fields, format_timestamp, UpdateTodo};

use super::{AttributeMap, AttributeValue};

/// The field set written by a todo update.
///
/// `Title`, `Description` and `UpdatedAt` are always set. `CompletedAt` is
/// always touched: set when `completed_at` is `Some`, removed otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub title: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ItemUpdate {
    /// Builds the field set for a caller update applied at `now`.
    pub fn from_request(request: &UpdateTodo, now: DateTime<Utc>) -> Self {
        Self {
            title: request.title.clone(),
            description: request.description.clone(),
            updated_at: now,
            completed_at: request.completed.then_some(now),
        }
    }

    /// Attributes to SET, in a stable order.
    pub fn set_attributes(&self) -> Vec<(&'static str, AttributeValue)> {
        let mut attributes = vec![
            (fields::TITLE, AttributeValue::S(self.title.clone())),
            (
                fields::DESCRIPTION,
                AttributeValue::S(self.description.clone()),
            ),
            (
                fields::UPDATED_AT,
                AttributeValue::S(format_timestamp(&self.updated_at)),
            ),
        ];
        if let Some(completed_at) = &self.completed_at {
            attributes.push((
                fields::COMPLETED_AT,
                AttributeValue::S(format_timestamp(completed_at)),
            ));
        }
        attributes
    }

    /// Attributes to REMOVE.
    pub fn removed_attributes(&self) -> Vec<&'static str> {
        if self.completed_at.is_none() {
            vec![fields::COMPLETED_AT]
        } else {
            Vec::new()
        }
    }

    /// Applies the update to an in-memory item.
    pub fn apply(&self, item: &mut AttributeMap) {
        for (name, value) in self.set_attributes() {
            item.insert(name.to_string(), value);
        }
        for name in self.removed_attributes() {
            item.remove(name);
        }
    }
}
