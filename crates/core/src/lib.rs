//! Functional core for taskcache.
//!
//! Pure types, codecs and trait definitions shared by the service binary.
//! Nothing in this crate performs I/O on its own; storage and cache backends
//! live in the `taskcache` crate and plug in through the traits defined here.

pub mod cache;
pub mod storage;
pub mod todo;
