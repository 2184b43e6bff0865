//! # Scopecache Core
//!
//! Building blocks for the scopecache manager router.
//!
//! This crate provides the bounded, time-expiring key-value store that backs
//! each manager cache, together with its configuration and statistics.
//!
//! ## Features
//!
//! - **Bounded size**: a fixed entry capacity, enforced synchronously on every `put`
//! - **LRU eviction**: the least recently accessed entry is evicted first
//! - **Idle TTL**: entries not accessed within the TTL window read as absent
//! - **Thread-safe**: a single `parking_lot::Mutex` guards map and recency queue
//! - **Statistics**: hit/miss/eviction/expiration counters (`stats` feature)
//!
//! ## Module Organization
//!
//! - [`cache_entry`] - Entry wrapper with insertion and last-access timestamps
//! - [`bounded_cache`] - The bounded LRU cache itself
//! - [`config`] - Capacity and TTL configuration with validation
//! - [`utils`] - Recency queue helpers
//!
mod bounded_cache;
mod cache_entry;
mod config;

pub mod utils;

#[cfg(feature = "stats")]
mod stats;

pub use bounded_cache::BoundedCache;
pub use cache_entry::CacheEntry;
pub use config::{CacheConfig, CacheConfigError, DEFAULT_CAPACITY, DEFAULT_TTL};

#[cfg(feature = "stats")]
pub use stats::CacheStats;
