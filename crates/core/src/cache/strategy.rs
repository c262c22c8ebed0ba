use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the service combines the cache with the backing store.
///
/// Chosen once when the service is built. Only [`CacheStrategy::CacheAside`]
/// is implemented; every other variant currently passes straight through to
/// the store and never touches the cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    /// No caching.
    Unset,
    /// Reads check the cache first and fill it in the background on a miss;
    /// writes go to the store and invalidate the cached entry.
    #[default]
    CacheAside,
    /// Writes update the store and the cache synchronously.
    WriteThrough,
    /// Writes are acknowledged after the cache is updated; the store write is
    /// deferred.
    WriteBack,
    /// Misses are filled inline by the cache layer before returning.
    ReadThrough,
    /// Writes bypass the cache; only reads populate it.
    WriteAround,
}

impl CacheStrategy {
    pub const ALL: [CacheStrategy; 6] = [
        CacheStrategy::Unset,
        CacheStrategy::CacheAside,
        CacheStrategy::WriteThrough,
        CacheStrategy::WriteBack,
        CacheStrategy::ReadThrough,
        CacheStrategy::WriteAround,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStrategy::Unset => "unset",
            CacheStrategy::CacheAside => "cache-aside",
            CacheStrategy::WriteThrough => "write-through",
            CacheStrategy::WriteBack => "write-back",
            CacheStrategy::ReadThrough => "read-through",
            CacheStrategy::WriteAround => "write-around",
        }
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown cache strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for CacheStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        CacheStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
