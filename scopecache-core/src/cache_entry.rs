use std::time::{Duration, Instant};

/// Internal wrapper that tracks when a value was inserted and last read.
/// Used for idle TTL expiration.
///
/// Each cached value is wrapped in a `CacheEntry` which records both the
/// insertion timestamp and the timestamp of the most recent access. Expiry is
/// measured from the last access, so an entry that keeps getting read never
/// expires while it stays within capacity.
///
/// # Type Parameters
///
/// * `V` - The type of the cached value
///
/// # Fields
///
/// * `value` - The actual cached value
/// * `inserted_at` - The `Instant` when this entry was created or replaced
/// * `last_accessed` - The `Instant` of the most recent `get` or `put`
///
/// # Examples
///
/// ```
/// use scopecache_core::CacheEntry;
/// use std::time::Duration;
///
/// let entry = CacheEntry::new(42);
/// assert_eq!(entry.value, 42);
///
/// // Check if expired (TTL of 60 seconds)
/// assert!(!entry.is_expired(Duration::from_secs(60)));
/// ```
#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
    pub last_accessed: Instant,
}

impl<V> CacheEntry<V> {
    /// Creates a new cache entry with both timestamps set to `Instant::now()`.
    pub fn new(value: V) -> Self {
        let now = Instant::now();
        Self {
            value,
            inserted_at: now,
            last_accessed: now,
        }
    }

    /// Returns true if the entry has been idle for longer than `ttl`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopecache_core::CacheEntry;
    /// use std::thread;
    /// use std::time::Duration;
    ///
    /// let entry = CacheEntry::new("data");
    /// assert!(!entry.is_expired(Duration::from_millis(50)));
    ///
    /// thread::sleep(Duration::from_millis(80));
    /// assert!(entry.is_expired(Duration::from_millis(50)));
    /// ```
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.last_accessed.elapsed() > ttl
    }

    /// Time since the value was inserted or last replaced.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    /// Marks the entry as accessed now, restarting its idle window.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}
