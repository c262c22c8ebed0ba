//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of `TodoStore` that keeps
//! attribute maps in a `BTreeMap` wrapped in `Arc<RwLock<_>>`. This is useful
//! for local runs and tests where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use taskcache::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! // Use store for testing...
//! ```

mod repository;

pub use repository::InMemoryStore;
