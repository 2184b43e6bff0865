use crate::CacheEntry;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Moves a key to the end of the order queue (marks as most recently used).
///
/// # Arguments
///
/// * `order` - A mutable reference to the order queue containing cache keys
/// * `key` - The key to move to the end of the queue
///
/// # Behavior
///
/// - If the key exists in the queue, it is removed from its current position and added to the end
/// - If the key doesn't exist, the queue remains unchanged
///
/// # Performance
///
/// O(n) in the number of queued keys: a linear scan to find the position,
/// then an O(1) push to the back.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
/// use scopecache_core::utils::move_key_to_end;
///
/// let mut order = VecDeque::from(vec!["key1", "key2", "key3"]);
///
/// // Access key2, marking it as most recently used
/// move_key_to_end(&mut order, &"key2");
///
/// // Order is now: ["key1", "key3", "key2"]
/// assert_eq!(order.back(), Some(&"key2"));
/// ```
///
/// ```
/// use std::collections::VecDeque;
/// use scopecache_core::utils::move_key_to_end;
///
/// let mut order = VecDeque::from(vec![1, 2]);
///
/// // Trying to move a non-existent key has no effect
/// move_key_to_end(&mut order, &3);
///
/// assert_eq!(order.len(), 2);
/// ```
pub fn move_key_to_end<K: PartialEq>(order: &mut VecDeque<K>, key: &K) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        if let Some(k) = order.remove(pos) {
            order.push_back(k);
        }
    }
}

/// Removes a key from both the cache map and the order queue.
///
/// Returns the removed entry, if the map held one. The order queue is cleaned
/// up regardless, so an orphaned queue key is dropped too.
///
/// # Examples
///
/// ```
/// use std::collections::{HashMap, VecDeque};
/// use scopecache_core::{CacheEntry, utils::remove_key};
///
/// let mut map = HashMap::new();
/// let mut order = VecDeque::new();
///
/// map.insert("key1", CacheEntry::new(42));
/// order.push_back("key1");
///
/// let removed = remove_key(&mut map, &mut order, &"key1");
/// assert_eq!(removed.map(|e| e.value), Some(42));
/// assert!(map.is_empty());
/// assert!(order.is_empty());
/// ```
pub fn remove_key<K, V>(
    map: &mut HashMap<K, CacheEntry<V>>,
    order: &mut VecDeque<K>,
    key: &K,
) -> Option<CacheEntry<V>>
where
    K: Eq + Hash,
{
    if let Some(pos) = order.iter().position(|k| k == key) {
        order.remove(pos);
    }
    map.remove(key)
}

/// Pops keys from the front of the order queue until one that is still
/// present in the map is found, and removes that entry.
///
/// Returns the evicted key and entry, or `None` when nothing could be evicted.
pub fn evict_least_recent<K, V>(
    map: &mut HashMap<K, CacheEntry<V>>,
    order: &mut VecDeque<K>,
) -> Option<(K, CacheEntry<V>)>
where
    K: Eq + Hash,
{
    while let Some(key) = order.pop_front() {
        // Skip orphaned keys whose entry is already gone
        if let Some(entry) = map.remove(&key) {
            return Some((key, entry));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_key_to_end_existing_key() {
        let mut order = VecDeque::from(vec!["key1", "key2", "key3"]);
        move_key_to_end(&mut order, &"key2");

        assert_eq!(order.len(), 3);
        assert_eq!(order[0], "key1");
        assert_eq!(order[1], "key3");
        assert_eq!(order[2], "key2");
    }

    #[test]
    fn test_move_key_to_end_first_key() {
        let mut order = VecDeque::from(vec!["key1", "key2", "key3"]);
        move_key_to_end(&mut order, &"key1");

        assert_eq!(order, VecDeque::from(vec!["key2", "key3", "key1"]));
    }

    #[test]
    fn test_move_key_to_end_nonexistent_key() {
        let mut order = VecDeque::from(vec!["key1", "key2"]);
        move_key_to_end(&mut order, &"key3");

        assert_eq!(order, VecDeque::from(vec!["key1", "key2"]));
    }

    #[test]
    fn test_move_key_to_end_empty_queue() {
        let mut order: VecDeque<&str> = VecDeque::new();
        move_key_to_end(&mut order, &"key1");
        assert!(order.is_empty());
    }

    #[test]
    fn test_remove_key_missing() {
        let mut map: HashMap<&str, CacheEntry<i32>> = HashMap::new();
        let mut order = VecDeque::from(vec!["orphan"]);

        assert!(remove_key(&mut map, &mut order, &"orphan").is_none());
        // Orphaned order entries are dropped as well
        assert!(order.is_empty());
    }

    #[test]
    fn test_evict_least_recent_skips_orphans() {
        let mut map = HashMap::new();
        map.insert("b", CacheEntry::new(2));
        map.insert("c", CacheEntry::new(3));
        let mut order = VecDeque::from(vec!["a", "b", "c"]);

        let (key, entry) = evict_least_recent(&mut map, &mut order).unwrap();
        assert_eq!(key, "b");
        assert_eq!(entry.value, 2);
        assert_eq!(order, VecDeque::from(vec!["c"]));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_evict_least_recent_empty() {
        let mut map: HashMap<u8, CacheEntry<u8>> = HashMap::new();
        let mut order = VecDeque::new();
        assert!(evict_least_recent(&mut map, &mut order).is_none());
    }
}
