//! Get-or-create routing over the three manager caches.

use crate::config::RouterConfig;
use crate::error::{ConfigError, ManagerError, ScopeError};
use crate::factory::{
    CollectionManagerFactory, GraphManagerFactory, IndexManagerFactory, ManagerKind,
};
use crate::scope::{CollectionScope, CompositeIndexKey, OrganizationScope};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use scopecache_core::BoundedCache;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[cfg(feature = "stats")]
use scopecache_core::CacheStats;

type InFlight<M> = Arc<OnceCell<Arc<M>>>;

/// One bounded cache plus the in-flight constructions for its keys.
struct ManagerCache<K, M> {
    kind: ManagerKind,
    cache: BoundedCache<K, Arc<M>>,
    in_flight: DashMap<K, InFlight<M>>,
}

impl<K, M> ManagerCache<K, M>
where
    K: Eq + Hash + Clone + Debug,
{
    fn new(kind: ManagerKind, config: &RouterConfig) -> Result<Self, ConfigError> {
        let cache = BoundedCache::new(config.for_kind(kind))
            .map_err(|source| ConfigError::InvalidCache { cache: kind, source })?;
        Ok(Self {
            kind,
            cache,
            in_flight: DashMap::new(),
        })
    }

    /// Returns the cached manager for `key`, or runs `create` and publishes
    /// its result.
    ///
    /// Construction is single-flight per key: concurrent misses on the same
    /// key share one in-flight slot, so only one caller runs `create` and the
    /// others block on that slot and receive the same `Arc`. Misses on other
    /// keys never wait. If `create` fails nothing is published, and a caller
    /// still waiting on the slot takes over and retries.
    fn get_or_create<E>(
        &self,
        key: K,
        create: impl FnOnce() -> Result<M, E>,
    ) -> Result<Arc<M>, ManagerError<E>> {
        if let Some(manager) = self.cache.get(&key) {
            return Ok(manager);
        }
        debug!(kind = %self.kind, ?key, "manager cache miss");

        let slot = Arc::clone(
            self.in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );

        let result = slot
            .get_or_try_init(|| {
                // A previous slot for this key may have published and been
                // retired between our lookup and joining this one. The miss
                // was already counted above.
                if let Some(manager) = self.cache.get_untracked(&key) {
                    return Ok(manager);
                }
                let manager = Arc::new(create()?);
                self.cache.put(key.clone(), Arc::clone(&manager));
                debug!(kind = %self.kind, ?key, "constructed and cached manager");
                Ok(manager)
            })
            .map(Arc::clone);

        self.in_flight
            .remove_if(&key, |_, current| Arc::ptr_eq(current, &slot));

        result.map_err(|source| {
            warn!(kind = %self.kind, ?key, "manager construction failed");
            ManagerError::Construction {
                kind: self.kind,
                source,
            }
        })
    }

    fn invalidate(&self, key: &K) -> bool {
        let removed = self.cache.remove(key).is_some();
        if removed {
            debug!(kind = %self.kind, ?key, "invalidated cached manager");
        }
        removed
    }
}

/// Memoizes collection, index and graph managers per tenancy scope.
///
/// The router owns three independent [`BoundedCache`]s, one per manager kind,
/// each with its own capacity and idle TTL from [`RouterConfig`]. The
/// factories are injected at construction and never change. Callers share
/// the router (typically behind an `Arc`) and receive `Arc` handles to
/// managers; a manager is dropped once it has left its cache and the last
/// caller handle is gone.
///
/// # Consistency
///
/// All three accessors use single-flight construction: while a manager for a
/// key is being built, other callers asking for that key wait for it instead
/// of invoking the factory again. Callers asking for other keys proceed
/// independently. A failed construction caches nothing, so the next call for
/// that key retries.
///
/// # Examples
///
/// ```
/// use scopecache::{
///     GraphManagerFactory, Id, ManagerCacheRouter, OrganizationScope, RouterConfig,
/// };
/// # use scopecache::{CollectionManagerFactory, CollectionScope, IndexManagerFactory};
/// use std::convert::Infallible;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// struct Graphs;
///
/// impl GraphManagerFactory for Graphs {
///     type Manager = String;
///     type Error = Infallible;
///
///     fn create_graph_manager(&self, scope: &OrganizationScope) -> Result<String, Infallible> {
///         Ok(format!("graph for {scope}"))
///     }
/// }
/// # struct Unused;
/// # impl CollectionManagerFactory for Unused {
/// #     type Manager = ();
/// #     type Error = Infallible;
/// #     fn create_collection_manager(&self, _: &CollectionScope) -> Result<(), Infallible> { Ok(()) }
/// # }
/// # impl IndexManagerFactory for Unused {
/// #     type Manager = ();
/// #     type Error = Infallible;
/// #     fn create_index_manager(&self, _: &OrganizationScope, _: &CollectionScope) -> Result<(), Infallible> { Ok(()) }
/// # }
///
/// let router = ManagerCacheRouter::new(RouterConfig::default(), Unused, Unused, Graphs).unwrap();
/// let org = OrganizationScope::new(Id::new(Uuid::new_v4(), "organization"));
///
/// let first = router.graph_manager(&org).unwrap();
/// let second = router.graph_manager(&org).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct ManagerCacheRouter<C, I, G>
where
    C: CollectionManagerFactory,
    I: IndexManagerFactory,
    G: GraphManagerFactory,
{
    collection_factory: C,
    index_factory: I,
    graph_factory: G,
    collection_managers: ManagerCache<CollectionScope, C::Manager>,
    index_managers: ManagerCache<CompositeIndexKey, I::Manager>,
    graph_managers: ManagerCache<OrganizationScope, G::Manager>,
    config: RouterConfig,
}

impl<C, I, G> ManagerCacheRouter<C, I, G>
where
    C: CollectionManagerFactory,
    I: IndexManagerFactory,
    G: GraphManagerFactory,
{
    /// Builds a router with one cache per manager kind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCache`] if any cache has a zero capacity
    /// or zero TTL.
    pub fn new(
        config: RouterConfig,
        collection_factory: C,
        index_factory: I,
        graph_factory: G,
    ) -> Result<Self, ConfigError> {
        let router = Self {
            collection_managers: ManagerCache::new(ManagerKind::Collection, &config)?,
            index_managers: ManagerCache::new(ManagerKind::Index, &config)?,
            graph_managers: ManagerCache::new(ManagerKind::Graph, &config)?,
            collection_factory,
            index_factory,
            graph_factory,
            config,
        };
        info!(
            collection_capacity = config.collection.capacity,
            index_capacity = config.index.capacity,
            graph_capacity = config.graph.capacity,
            "manager cache router ready"
        );
        Ok(router)
    }

    /// Returns the collection manager for `scope`, building it on a miss.
    pub fn collection_manager(
        &self,
        scope: &CollectionScope,
    ) -> Result<Arc<C::Manager>, ManagerError<C::Error>> {
        check_scope(ManagerKind::Collection, scope.validate())?;
        self.collection_managers.get_or_create(scope.clone(), || {
            self.collection_factory.create_collection_manager(scope)
        })
    }

    /// Returns the index manager for the `(organization, collection)` pair,
    /// building it on a miss.
    pub fn index_manager(
        &self,
        organization: &OrganizationScope,
        collection: &CollectionScope,
    ) -> Result<Arc<I::Manager>, ManagerError<I::Error>> {
        check_scope(ManagerKind::Index, organization.validate())?;
        check_scope(ManagerKind::Index, collection.validate())?;
        let key = CompositeIndexKey::new(organization.clone(), collection.clone());
        self.index_managers.get_or_create(key, || {
            self.index_factory.create_index_manager(organization, collection)
        })
    }

    /// Returns the graph manager for `scope`, building it on a miss.
    pub fn graph_manager(
        &self,
        scope: &OrganizationScope,
    ) -> Result<Arc<G::Manager>, ManagerError<G::Error>> {
        check_scope(ManagerKind::Graph, scope.validate())?;
        self.graph_managers
            .get_or_create(scope.clone(), || self.graph_factory.create_graph_manager(scope))
    }

    /// Drops the cached collection manager for `scope`, if any.
    ///
    /// Callers already holding the manager keep it; the next lookup builds
    /// a new one.
    pub fn invalidate_collection_manager(&self, scope: &CollectionScope) -> bool {
        self.collection_managers.invalidate(scope)
    }

    /// Drops the cached index manager for the pair, if any.
    pub fn invalidate_index_manager(
        &self,
        organization: &OrganizationScope,
        collection: &CollectionScope,
    ) -> bool {
        self.index_managers.invalidate(&CompositeIndexKey::new(
            organization.clone(),
            collection.clone(),
        ))
    }

    /// Drops the cached graph manager for `scope`, if any.
    pub fn invalidate_graph_manager(&self, scope: &OrganizationScope) -> bool {
        self.graph_managers.invalidate(scope)
    }

    /// Sweeps expired entries from all three caches.
    pub fn purge_expired(&self) -> usize {
        self.collection_managers.cache.purge_expired()
            + self.index_managers.cache.purge_expired()
            + self.graph_managers.cache.purge_expired()
    }

    /// Empties all three caches.
    pub fn clear(&self) {
        self.collection_managers.cache.clear();
        self.index_managers.cache.clear();
        self.graph_managers.cache.clear();
        debug!("cleared all manager caches");
    }

    /// Number of managers resident in the cache for `kind`.
    pub fn cached_managers(&self, kind: ManagerKind) -> usize {
        match kind {
            ManagerKind::Collection => self.collection_managers.cache.len(),
            ManagerKind::Index => self.index_managers.cache.len(),
            ManagerKind::Graph => self.graph_managers.cache.len(),
        }
    }

    /// Snapshot of the hit/miss/eviction counters for `kind`.
    #[cfg(feature = "stats")]
    pub fn stats(&self, kind: ManagerKind) -> CacheStats {
        match kind {
            ManagerKind::Collection => self.collection_managers.cache.stats().clone(),
            ManagerKind::Index => self.index_managers.cache.stats().clone(),
            ManagerKind::Graph => self.graph_managers.cache.stats().clone(),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

fn check_scope<E>(
    kind: ManagerKind,
    validation: Result<(), ScopeError>,
) -> Result<(), ManagerError<E>> {
    validation.map_err(|err| {
        warn!(%kind, error = %err, "rejected invalid scope");
        ManagerError::InvalidScope(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Id;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;
    use uuid::Uuid;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    fn org(n: u128) -> OrganizationScope {
        OrganizationScope::new(Id::new(Uuid::from_u128(n), "organization"))
    }

    fn cache(capacity: usize) -> ManagerCache<OrganizationScope, usize> {
        let config = RouterConfig::uniform(scopecache_core::CacheConfig::new(
            capacity,
            Duration::from_secs(3600),
        ));
        ManagerCache::new(ManagerKind::Graph, &config).unwrap()
    }

    #[test]
    fn test_get_or_create_caches_result() {
        let cache = cache(4);
        let calls = AtomicUsize::new(0);
        let create = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Boom>(42)
        };

        let first = cache.get_or_create(org(1), create).unwrap();
        let second = cache.get_or_create(org(1), create).unwrap();

        assert_eq!(*first, 42);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.in_flight.is_empty());
    }

    #[test]
    fn test_failed_construction_is_not_cached() {
        let cache = cache(4);

        let err = cache
            .get_or_create(org(1), || Err::<usize, _>(Boom))
            .unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Construction {
                kind: ManagerKind::Graph,
                ..
            }
        ));
        assert!(cache.cache.is_empty());
        assert!(cache.in_flight.is_empty());

        let retried = cache.get_or_create(org(1), || Ok::<_, Boom>(7)).unwrap();
        assert_eq!(*retried, 7);
    }

    #[test]
    fn test_concurrent_misses_construct_once() {
        let cache = Arc::new(cache(4));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];

        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(thread::spawn(move || {
                cache
                    .get_or_create(org(9), || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(50));
                        Ok::<_, Boom>(99)
                    })
                    .unwrap()
            }));
        }

        let managers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(managers.iter().all(|m| Arc::ptr_eq(m, &managers[0])));
        assert!(cache.in_flight.is_empty());
    }

    #[test]
    fn test_invalidate() {
        let cache = cache(4);
        let first = cache.get_or_create(org(1), || Ok::<_, Boom>(1)).unwrap();

        assert!(cache.invalidate(&org(1)));
        assert!(!cache.invalidate(&org(1)));

        let second = cache.get_or_create(org(1), || Ok::<_, Boom>(1)).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
