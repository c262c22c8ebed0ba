mod attribute;
mod error;
mod traits;
mod update;

pub use attribute::{AttributeMap, AttributeValue};
pub use error::{RepositoryError, Result};
pub use traits::{ItemStream, TodoStore};
pub use update::ItemUpdate;
