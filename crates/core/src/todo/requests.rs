use serde::{Deserialize, Serialize};

/// Caller-supplied fields for updating a todo.
///
/// Title and description are replaced wholesale; `completed` decides whether
/// the completion timestamp is stamped or cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl UpdateTodo {
    /// Create an update that leaves the todo incomplete.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }

    /// Set the completion flag.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}
