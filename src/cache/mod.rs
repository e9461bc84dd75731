//! Cache module for storing API responses in memory and on disk
//!
//! This module provides a TTL cache that keeps every entry in memory and mirrors
//! it to one JSON file per key. Disk failures never reach the caller: a cache
//! that cannot be read or written simply behaves like an empty cache.

mod manager;

pub use manager::{cache_key, CacheEntry, TtlCache};
