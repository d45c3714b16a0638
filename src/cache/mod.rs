//! Local caching module for avoiding redundant network round trips.
//!
//! This module provides `TimedCache<T>`, a TTL-bound cache of a collection
//! keyed by an owner identifier (the user id for accounts). Cached data is
//! considered stale after 1 day and is cleared the first time a stale read
//! observes it.
//!
//! The cache is never a source of truth: every successful remote fetch
//! overwrites it unconditionally.

pub mod manager;

pub use manager::TimedCache;
