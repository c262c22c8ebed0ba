use std::collections::HashMap;

/// A stored item: attribute name to typed value.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// A typed attribute value at the storage boundary.
///
/// Mirrors the subset of the backing store's value kinds the codec cares
/// about. Anything else is carried as [`AttributeValue::Unsupported`] so the
/// codec can report a type mismatch instead of losing the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// String value.
    S(String),
    /// Number value, kept in its textual wire form.
    N(String),
    Bool(bool),
    Null,
    /// A store-native kind with no mapping here (lists, maps, sets, binary).
    Unsupported(&'static str),
}

impl AttributeValue {
    /// Returns the string payload if this is an `S` value.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number payload if this is an `N` value.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    /// Short name of the value kind, for logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Null => "NULL",
            AttributeValue::Unsupported(kind) => kind,
        }
    }
}
