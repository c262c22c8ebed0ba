mod error;
mod keys;
mod serialization;
mod strategy;
mod traits;
mod typed;

pub use error::{CacheError, Result};
pub use keys::todo_key;
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use strategy::{CacheStrategy, UnknownStrategy};
pub use traits::Cache;
pub use typed::{CacheLookup, TypedCache};
