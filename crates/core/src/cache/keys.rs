use uuid::Uuid;

/// Returns the cache key for a single todo.
///
/// The key is the bare hyphenated id so entries written by other clients of
/// the same cache are shared.
pub fn todo_key(todo_id: Uuid) -> String {
    todo_id.to_string()
}
