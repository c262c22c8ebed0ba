use std::{env, num::NonZeroUsize, str::FromStr, time::Duration};

use taskcache_core::cache::{CacheStrategy, UnknownStrategy};
use thiserror::Error;

use crate::service::ServiceConfig;

const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_POPULATE_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_CACHE_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Configuration values that cannot be defaulted away.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CACHE_STRATEGY: {0}")]
    InvalidStrategy(#[from] UnknownStrategy),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cache strategy (default: cache-aside)
    pub cache_strategy: CacheStrategy,
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Timeout for a background cache fill in milliseconds (default: 2,000)
    pub populate_timeout_ms: u64,
    /// Maximum number of in-memory cache entries (default: 10,000)
    #[cfg_attr(not(feature = "memory"), allow(dead_code))]
    pub cache_max_entries: NonZeroUsize,
    /// Redis connection URL (default: "redis://localhost:6379")
    #[cfg_attr(not(feature = "redis"), allow(dead_code))]
    pub redis_url: String,
    /// DynamoDB table holding todos (default: "todos")
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub dynamodb_table_name: String,
    /// Endpoint override, e.g. for DynamoDB Local
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_STRATEGY` - Strategy name, unknown names are rejected (default: "cache-aside")
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds, zero means default (default: 300)
    /// - `CACHE_POPULATE_TIMEOUT_MS` - Background fill timeout (default: 2,000)
    /// - `CACHE_MAX_ENTRIES` - Maximum in-memory cache entries (default: 10,000)
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `DYNAMODB_TABLE_NAME` - DynamoDB table name (default: "todos")
    /// - `DYNAMODB_ENDPOINT` - DynamoDB endpoint override (default: unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// Numeric values that are missing, zero or unparsable fall back to their
    /// defaults; a strategy name that is set must be valid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cache_strategy = match lookup("CACHE_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => CacheStrategy::default(),
        };

        Ok(Self {
            cache_strategy,
            cache_ttl_seconds: parsed(&lookup, "CACHE_TTL_SECONDS")
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
            populate_timeout_ms: parsed(&lookup, "CACHE_POPULATE_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_POPULATE_TIMEOUT_MS),
            cache_max_entries: parsed(&lookup, "CACHE_MAX_ENTRIES")
                .unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            dynamodb_table_name: lookup("DYNAMODB_TABLE_NAME")
                .unwrap_or_else(|| "todos".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|v| !v.is_empty()),
        })
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn populate_timeout(&self) -> Duration {
        Duration::from_millis(self.populate_timeout_ms)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            cache_strategy: self.cache_strategy,
            cache_ttl: self.cache_ttl(),
            populate_timeout: self.populate_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_strategy: CacheStrategy::default(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            populate_timeout_ms: DEFAULT_POPULATE_TIMEOUT_MS,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: "redis://localhost:6379".to_string(),
            dynamodb_table_name: "todos".to_string(),
            dynamodb_endpoint: None,
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}
