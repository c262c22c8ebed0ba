mod codec;
mod error;
mod requests;
mod types;

pub use codec::{
    fields, format_timestamp, item_to_todo, parse_timestamp, todo_to_item, ItemCodec,
};
pub use error::DecodeError;
pub use requests::UpdateTodo;
pub use types::Todo;
