mod background;
mod cache;
mod cli;
mod config;
mod output;
mod service;
mod storage;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use taskcache_core::cache::Cache;
use taskcache_core::storage::TodoStore;
use taskcache_core::todo::UpdateTodo;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::output::{render_todo, render_todos};
use crate::service::{parse_todo_id, ServiceError, TodoService};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskcache=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let service = TodoService::new(
        init_store(&config).await,
        init_cache(&config).await?,
        config.service_config(),
    );

    let user_id = command_user(&cli.command, cli.user.as_deref())?;
    let result = run_command(&service, user_id, cli.command, cli.format).await;

    if let Err(err) = &result {
        if err
            .downcast_ref::<ServiceError>()
            .is_some_and(ServiceError::is_transient)
        {
            tracing::warn!("Backend temporarily unavailable, the command can be retried");
        }
    }

    result
}

#[cfg(feature = "inmemory")]
async fn init_store(_config: &Config) -> Arc<dyn TodoStore> {
    tracing::info!("Using in-memory store");
    Arc::new(storage::InMemoryStore::new())
}

#[cfg(feature = "dynamodb")]
async fn init_store(config: &Config) -> Arc<dyn TodoStore> {
    tracing::info!(
        table = %config.dynamodb_table_name,
        endpoint = ?config.dynamodb_endpoint,
        "Using DynamoDB store"
    );
    Arc::new(
        storage::DynamoDbStore::connect(
            config.dynamodb_table_name.clone(),
            config.dynamodb_endpoint.as_deref(),
        )
        .await,
    )
}

#[cfg(feature = "memory")]
async fn init_cache(config: &Config) -> Result<Arc<dyn Cache>> {
    tracing::info!(
        max_entries = config.cache_max_entries.get(),
        "Using in-memory cache"
    );
    Ok(Arc::new(cache::MemoryCache::new(config.cache_max_entries)))
}

#[cfg(feature = "redis")]
async fn init_cache(config: &Config) -> Result<Arc<dyn Cache>> {
    tracing::info!(url = %config.redis_url, "Using Redis cache");
    Ok(Arc::new(cache::RedisCache::new(&config.redis_url).await?))
}

fn required_user(raw: Option<&str>) -> Result<Uuid, ServiceError> {
    let raw = raw.ok_or_else(|| {
        ServiceError::Validation("--user (or TASKCACHE_USER) is required".to_string())
    })?;
    parse_todo_id("user", raw)
}

/// The demo is the only command that may run as a throwaway user.
fn command_user(command: &Commands, raw: Option<&str>) -> Result<Uuid, ServiceError> {
    match (command, raw) {
        (Commands::Demo, None) => Ok(Uuid::new_v4()),
        (_, raw) => required_user(raw),
    }
}

/// Rejects blank titles before they reach the service.
fn required_title(title: &str) -> Result<&str, ServiceError> {
    if title.trim().is_empty() {
        return Err(ServiceError::Validation("--title must not be empty".to_string()));
    }
    Ok(title)
}

async fn run_command(
    service: &TodoService,
    user_id: Uuid,
    command: Commands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Create { title, description } => {
            let title = required_title(&title)?;
            let todo = service.create(user_id, title, &description).await?;
            println!("{}", render_todo(&todo, format));
        }
        Commands::Get { id } => {
            let id = parse_todo_id("id", &id)?;
            let todo = service.find_by_id(user_id, id).await?;
            println!("{}", render_todo(&todo, format));
        }
        Commands::List => {
            let todos = service.list(user_id).await?;
            println!("{}", render_todos(&todos, format));
        }
        Commands::Update {
            id,
            title,
            description,
            completed,
        } => {
            let id = parse_todo_id("id", &id)?;
            required_title(&title)?;
            let params = UpdateTodo::new(title, description).with_completed(completed);
            service.update(user_id, id, &params).await?;
            let todo = service.find_by_id(user_id, id).await?;
            println!("{}", render_todo(&todo, format));
        }
        Commands::Delete { id } => {
            let id = parse_todo_id("id", &id)?;
            service.delete(user_id, id).await?;
            if format == OutputFormat::Pretty {
                println!("Deleted todo {}", id);
            }
        }
        Commands::Demo => run_demo(service, user_id, format).await?,
    }

    Ok(())
}

/// Exercises every operation in one process, which is the only way to see
/// anything persist with the in-memory backends.
async fn run_demo(service: &TodoService, user_id: Uuid, format: OutputFormat) -> Result<()> {
    tracing::info!(%user_id, strategy = %service.strategy(), "Running demo");

    let todo = service.create(user_id, "buy milk", "two liters").await?;
    println!("{}", render_todo(&todo, format));

    // First read misses and fills the cache in the background; the second
    // may be served from the cache.
    service.find_by_id(user_id, todo.id).await?;
    let found = service.find_by_id(user_id, todo.id).await?;
    println!("{}", render_todo(&found, format));

    let params = UpdateTodo::new("buy bread", "whole grain").with_completed(true);
    service.update(user_id, todo.id, &params).await?;
    let updated = service.find_by_id(user_id, todo.id).await?;
    println!("{}", render_todo(&updated, format));

    service.create(user_id, "water plants", "").await?;
    println!("{}", render_todos(&service.list(user_id).await?, format));

    service.delete(user_id, todo.id).await?;
    match service.find_by_id(user_id, todo.id).await {
        Err(ServiceError::NotFound { id }) => tracing::info!(todo_id = %id, "Deleted todo is gone"),
        Ok(_) => anyhow::bail!("todo {} survived deletion", todo.id),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_user_missing() {
        assert!(matches!(
            required_user(None),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_required_user_malformed() {
        assert!(matches!(
            required_user(Some("alice")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_required_user_valid() {
        let id = Uuid::new_v4();
        assert_eq!(required_user(Some(&id.to_string())), Ok(id));
    }

    #[test]
    fn test_command_user() {
        assert!(command_user(&Commands::Demo, None).is_ok());
        assert!(matches!(
            command_user(&Commands::List, None),
            Err(ServiceError::Validation(_))
        ));
        let id = Uuid::new_v4();
        assert_eq!(command_user(&Commands::Demo, Some(&id.to_string())), Ok(id));
    }

    #[cfg(all(feature = "inmemory", feature = "memory"))]
    #[tokio::test]
    async fn test_demo_runs_through_command_dispatch() {
        let config = Config::default();
        let service = TodoService::new(
            init_store(&config).await,
            init_cache(&config).await.unwrap(),
            crate::service::ServiceConfig {
                cache_strategy: taskcache_core::cache::CacheStrategy::WriteThrough,
                ..config.service_config()
            },
        );

        run_command(&service, Uuid::new_v4(), Commands::Demo, OutputFormat::Json)
            .await
            .unwrap();
    }

    #[test]
    fn test_required_title() {
        assert_eq!(required_title("buy milk"), Ok("buy milk"));
        assert!(matches!(
            required_title("   "),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(required_title(""), Err(ServiceError::Validation(_))));
    }
}
