//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};

/// Todo store fronted by a configurable cache strategy.
#[derive(Debug, Parser)]
#[command(name = "taskcache")]
#[command(about = "Todo store fronted by a configurable cache strategy", long_about = None)]
pub struct Cli {
    /// Owner of the todos (UUID).
    #[arg(long, env = "TASKCACHE_USER", global = true)]
    pub user: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new todo.
    Create {
        /// Todo title.
        #[arg(long)]
        title: String,
        /// Optional description.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a single todo.
    Get {
        /// Todo ID.
        id: String,
    },
    /// List every todo of the user.
    List,
    /// Replace a todo's title and description.
    Update {
        /// Todo ID.
        id: String,
        /// New title.
        #[arg(long)]
        title: String,
        /// New description.
        #[arg(long, default_value = "")]
        description: String,
        /// Mark the todo as completed; omitting it reopens the todo.
        #[arg(long)]
        completed: bool,
    },
    /// Delete a todo.
    Delete {
        /// Todo ID.
        id: String,
    },
    /// Run create, get, update, list and delete against a scratch todo.
    Demo,
}
