use super::*;

#[test]
fn evicts_least_recently_used() {
    let mut cache = LruCache::new(2);
    cache.put("a", 1);
    cache.put("b", 2);
    // Touch "a" so "b" becomes the eviction candidate.
    assert_eq!(cache.get(&"a"), Some(&1));
    let evicted = cache.put("c", 3);

    assert_eq!(evicted, Some(("b", 2)));
    assert_eq!(cache.get(&"b"), None);
    assert_eq!(cache.get(&"a"), Some(&1));
    assert_eq!(cache.get(&"c"), Some(&3));
    assert_eq!(cache.len(), 2);
}

#[test]
fn replacing_a_key_does_not_grow() {
    let mut cache = LruCache::new(2);
    cache.put(1, "x");
    cache.put(1, "y");
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&1), Some(&"y"));
}

#[test]
fn zero_capacity_is_clamped() {
    let mut cache = LruCache::new(0);
    assert_eq!(cache.capacity(), 1);
    cache.put(1, 1);
    cache.put(2, 2);
    assert!(!cache.contains(&1));
    assert!(cache.contains(&2));
    cache.clear();
    assert!(cache.is_empty());
}
