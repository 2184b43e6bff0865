//! # Scopecache
//!
//! Memoizes expensive, per-tenant persistence managers.
//!
//! A multi-tenant store hands out three kinds of manager, each bound to a
//! tenancy scope:
//!
//! | Manager    | Keyed by                                         |
//! |------------|--------------------------------------------------|
//! | collection | [`CollectionScope`]                              |
//! | index      | [`CompositeIndexKey`] (organization + collection) |
//! | graph      | [`OrganizationScope`]                            |
//!
//! Building a manager may open connections or warm internal state, so
//! [`ManagerCacheRouter`] keeps at most one instance per scope, reused by
//! every caller until it is evicted (LRU, bounded capacity) or expires
//! (idle TTL).
//!
//! ## Features
//!
//! - **Get-or-create**: one accessor per manager kind, building on a miss
//! - **Single-flight**: concurrent misses on one key run the factory once
//! - **Independent caches**: capacity and TTL configured per manager kind
//! - **No caching of failures**: a failed construction is retried next call
//! - **Statistics**: per-cache hit/miss/eviction counters (`stats` feature)
//!
//! ## Quick Start
//!
//! Implement the three factory traits for your persistence layer, then build
//! a router once at startup and share it:
//!
//! ```no_run
//! use scopecache::{
//!     CollectionScope, ConfigLoader, Id, ManagerCacheRouter, OrganizationScope,
//! };
//! # use scopecache::{CollectionManagerFactory, GraphManagerFactory, IndexManagerFactory};
//! # use std::convert::Infallible;
//! use std::sync::Arc;
//! use uuid::Uuid;
//! # struct MyCollectionFactory;
//! # impl CollectionManagerFactory for MyCollectionFactory {
//! #     type Manager = ();
//! #     type Error = Infallible;
//! #     fn create_collection_manager(&self, _: &CollectionScope) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct MyIndexFactory;
//! # impl IndexManagerFactory for MyIndexFactory {
//! #     type Manager = ();
//! #     type Error = Infallible;
//! #     fn create_index_manager(&self, _: &OrganizationScope, _: &CollectionScope) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct MyGraphFactory;
//! # impl GraphManagerFactory for MyGraphFactory {
//! #     type Manager = ();
//! #     type Error = Infallible;
//! #     fn create_graph_manager(&self, _: &OrganizationScope) -> Result<(), Infallible> { Ok(()) }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load_from_file("scopecache.yaml")?;
//! let router = Arc::new(ManagerCacheRouter::new(
//!     config,
//!     MyCollectionFactory,
//!     MyIndexFactory,
//!     MyGraphFactory,
//! )?);
//!
//! let org = Id::new(Uuid::new_v4(), "organization");
//! let owner = Id::new(Uuid::new_v4(), "application");
//! let org_scope = OrganizationScope::new(org.clone());
//! let users_scope = CollectionScope::new(org, owner, "users");
//!
//! let users = router.collection_manager(&users_scope)?;
//! let index = router.index_manager(&org_scope, &users_scope)?;
//! let graph = router.graph_manager(&org_scope)?;
//! # let _ = (users, index, graph);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`ConfigLoader`] merges defaults (capacity 50, one hour TTL for each
//! cache), an optional YAML file and `SCOPECACHE_*` environment variables,
//! e.g. `SCOPECACHE_GRAPH__CAPACITY=10`.
//!
//! ## Logging
//!
//! The crate emits `tracing` events (hits at `trace`, misses, constructions
//! and evictions at `debug`, failures at `warn`). Install any subscriber to
//! see them.

mod config;
mod error;
mod factory;
mod router;
mod scope;

pub use config::{ConfigLoader, RouterConfig};
pub use error::{ConfigError, ManagerError, ScopeError};
pub use factory::{
    CollectionManagerFactory, GraphManagerFactory, IndexManagerFactory, ManagerKind,
};
pub use router::ManagerCacheRouter;
pub use scope::{CollectionScope, CompositeIndexKey, Id, OrganizationScope};

pub use scopecache_core::{BoundedCache, CacheConfig, CacheConfigError};

#[cfg(feature = "stats")]
pub use scopecache_core::CacheStats;
