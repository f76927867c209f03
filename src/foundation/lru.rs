use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Small least-recently-used map.
///
/// Recency is tracked in a queue next to the map; capacities used by the engine are in the
/// hundreds, so the linear `touch` is fine.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    map: HashMap<K, V>,
    lru: VecDeque<K>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Look up `key`, marking it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.map.contains_key(key) {
            self.touch(key.clone());
            return self.map.get(key);
        }
        None
    }

    /// Insert or replace `key`, evicting the least recently used entries beyond capacity.
    ///
    /// Returns the evicted key/value pair, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.map.insert(key.clone(), value);
        self.touch(key);
        let mut evicted = None;
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                evicted = self.map.remove(&old).map(|v| (old, v));
            }
        }
        evicted
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.lru.clear();
    }

    fn touch(&mut self, key: K) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/lru.rs"]
mod tests;
