use crate::utils::{evict_least_recent, move_key_to_end, remove_key};
use crate::{CacheConfig, CacheConfigError, CacheEntry};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;
use tracing::{debug, trace};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// Map and recency queue, always mutated together.
struct CacheState<K, V> {
    map: HashMap<K, CacheEntry<V>>,
    order: VecDeque<K>,
}

/// A thread-safe, fixed-capacity cache with LRU eviction and idle TTL.
///
/// Each instance owns its storage; nothing is global. Instances are meant to
/// be held as fields of a longer-lived value and shared by reference.
///
/// # Type Parameters
///
/// * `K` - The key type. Compared by value (`Eq + Hash`).
/// * `V` - The value type. `get` hands out clones, so cheap-to-clone values
///   such as `Arc<T>` are the intended use.
///
/// # Eviction Behavior
///
/// - **Capacity**: after every `put` the least recently used entries are
///   removed until at most `capacity` entries remain. Only entries present at
///   the time of that `put` are candidates.
/// - **TTL**: an entry not accessed for longer than `ttl` reads as absent and
///   is removed on that read. `purge_expired` sweeps the rest.
///
/// # Thread Safety
///
/// The map and the order queue share one `parking_lot::Mutex`, so size and
/// recency never disagree, whatever the interleaving of concurrent `get` and
/// `put` calls. Every operation holds the lock for a bounded amount of work
/// and never calls user code while holding it (values are cloned, not
/// constructed, under the lock).
///
/// # Performance Characteristics
///
/// - **Get**: O(1) lookup plus O(n) recency reordering on a hit
/// - **Put**: O(n) for the queue update, O(1) per evicted entry
///
/// # Examples
///
/// ```
/// use scopecache_core::{BoundedCache, CacheConfig};
/// use std::time::Duration;
///
/// let cache = BoundedCache::new(CacheConfig::new(2, Duration::from_secs(60))).unwrap();
///
/// cache.put("a", 1);
/// cache.put("b", 2);
/// assert_eq!(cache.get(&"a"), Some(1)); // "a" is now most recent
///
/// cache.put("c", 3); // evicts "b"
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.len(), 2);
/// ```
pub struct BoundedCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    capacity: usize,
    ttl: Duration,
    #[cfg(feature = "stats")]
    stats: CacheStats,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    /// Creates an empty cache with the given capacity and TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheConfigError`] if the capacity or TTL is zero.
    pub fn new(config: CacheConfig) -> Result<Self, CacheConfigError> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(CacheState {
                map: HashMap::with_capacity(config.capacity),
                order: VecDeque::with_capacity(config.capacity),
            }),
            capacity: config.capacity,
            ttl: config.ttl(),
            #[cfg(feature = "stats")]
            stats: CacheStats::new(),
        })
    }

    /// Retrieves a cached value by key.
    ///
    /// # Returns
    ///
    /// * `Some(V)` - A clone of the value if present and not expired
    /// * `None` - If the key is absent or its entry has expired
    ///
    /// # Side Effects
    ///
    /// - A hit moves the key to the most recently used position and restarts
    ///   the entry's idle window.
    /// - An expired entry is removed from both map and order queue.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lookup(key, true)
    }

    /// Like [`get`](Self::get), but records no hit or miss.
    ///
    /// For a second look at a key whose lookup was already counted, such as a
    /// re-check after waiting on a concurrent insert. Recency and expiry are
    /// handled exactly as in `get`.
    pub fn get_untracked(&self, key: &K) -> Option<V> {
        self.lookup(key, false)
    }

    #[cfg_attr(not(feature = "stats"), allow(unused_variables))]
    fn lookup(&self, key: &K, track: bool) -> Option<V> {
        let mut state = self.state.lock();
        let CacheState { map, order } = &mut *state;

        let expired = match map.get_mut(key) {
            None => {
                #[cfg(feature = "stats")]
                if track {
                    self.stats.record_miss();
                }
                return None;
            }
            Some(entry) if entry.is_expired(self.ttl) => true,
            Some(entry) => {
                entry.touch();
                false
            }
        };

        if expired {
            if let Some(entry) = remove_key(map, order, key) {
                debug!(?key, age = ?entry.age(), "cache entry expired");
            }
            #[cfg(feature = "stats")]
            {
                self.stats.record_expiration();
                if track {
                    self.stats.record_miss();
                }
            }
            return None;
        }

        move_key_to_end(order, key);
        #[cfg(feature = "stats")]
        if track {
            self.stats.record_hit();
        }
        trace!(?key, "cache hit");
        map.get(key).map(|entry| entry.value.clone())
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// The entry's timestamps are reset and the key becomes the most recently
    /// used. If the cache now holds more than `capacity` entries, least
    /// recently used entries are evicted until it is back within bound.
    pub fn put(&self, key: K, value: V) {
        let mut state = self.state.lock();
        let CacheState { map, order } = &mut *state;

        if map.insert(key.clone(), CacheEntry::new(value)).is_some() {
            move_key_to_end(order, &key);
        } else {
            order.push_back(key);
        }

        while map.len() > self.capacity {
            match evict_least_recent(map, order) {
                Some((evicted, entry)) => {
                    debug!(
                        key = ?evicted,
                        age = ?entry.age(),
                        capacity = self.capacity,
                        "evicted least recently used entry"
                    );
                    #[cfg(feature = "stats")]
                    self.stats.record_eviction();
                }
                None => break,
            }
        }
    }

    /// Removes the entry for `key`, returning its value if one was resident.
    ///
    /// Expired entries are removed but not returned.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let CacheState { map, order } = &mut *state;
        remove_key(map, order, key)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.value)
    }

    /// Returns true if a fresh entry exists for `key`.
    ///
    /// Unlike `get`, this does not touch recency, the idle window, or stats.
    pub fn contains(&self, key: &K) -> bool {
        self.state
            .lock()
            .map
            .get(key)
            .is_some_and(|entry| !entry.is_expired(self.ttl))
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut state = self.state.lock();
        let CacheState { map, order } = &mut *state;

        let before = map.len();
        let ttl = self.ttl;
        map.retain(|_, entry| !entry.is_expired(ttl));
        order.retain(|k| map.contains_key(k));
        let purged = before - map.len();

        if purged > 0 {
            debug!(purged, "purged expired cache entries");
            #[cfg(feature = "stats")]
            self.stats.record_expirations(purged as u64);
        }
        purged
    }

    /// Number of physically resident entries, including expired ones not yet
    /// swept.
    pub fn len(&self) -> usize {
        self.state.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Vec<K> {
        self.state.lock().order.iter().cloned().collect()
    }

    /// Clears all entries from the cache.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.map.clear();
        state.order.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a reference to the cache statistics.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<K, V> Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("len", &self.state.lock().map.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}
