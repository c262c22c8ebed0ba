//! Output formatting functions.

use taskcache_core::todo::Todo;

use crate::cli::OutputFormat;

/// Format a value for output.
pub fn format_output<T: serde::Serialize>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Pretty => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

/// Format a todo for display.
pub fn format_todo(todo: &Todo) -> String {
    let mark = if todo.is_completed() { "x" } else { " " };
    let mut output = format!(
        "[{}] {}\n  ID: {}\n  Created: {}",
        mark, todo.title, todo.id, todo.created_at
    );
    if !todo.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", todo.description));
    }
    if let Some(updated_at) = todo.updated_at {
        output.push_str(&format!("\n  Updated: {}", updated_at));
    }
    if let Some(completed_at) = todo.completed_at {
        output.push_str(&format!("\n  Completed: {}", completed_at));
    }
    output
}

/// Format todos for display.
pub fn format_todos(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No todos found.".to_string();
    }
    let mut output = format!("TODOS ({})\n", todos.len());
    output.push_str(&"-".repeat(40));
    for todo in todos {
        output.push_str(&format!("\n{}", format_todo(todo)));
        output.push('\n');
    }
    output
}

/// Renders a single todo in the requested format.
pub fn render_todo(todo: &Todo, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_output(todo, format),
        OutputFormat::Pretty => format_todo(todo),
    }
}

/// Renders a list of todos in the requested format.
pub fn render_todos(todos: &[Todo], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_output(&todos, format),
        OutputFormat::Pretty => format_todos(todos),
    }
}
