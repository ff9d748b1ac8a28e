use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::options::DEFAULT_LOAD_FACTOR;

/// The unordered key/value storage behind an `OrderedMap`.
///
/// Wraps a `HashMap` and grows it according to the configured load factor.
#[derive(Clone)]
pub(crate) struct BaseMap<K, V> {
    map: HashMap<K, V>,
    load_factor: f32,
}

/// Number of slots needed to hold `len` entries below `load_factor`.
fn slots_for(len: usize, load_factor: f32) -> usize {
    (len as f64 / load_factor as f64).ceil() as usize
}

impl<K, V> BaseMap<K, V> {
    pub fn new() -> Self {
        BaseMap {
            map: HashMap::new(),
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    pub fn with_capacity(capacity: usize, load_factor: f32) -> Self {
        BaseMap {
            map: HashMap::with_capacity(slots_for(capacity, load_factor)),
            load_factor,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn values(&self) -> std::collections::hash_map::Values<'_, K, V> {
        self.map.values()
    }

    /// Entries the map can hold before the next growth.
    fn threshold(&self) -> usize {
        (self.map.capacity() as f64 * self.load_factor as f64) as usize
    }
}

impl<K, V> BaseMap<K, V>
where
    K: Eq + Hash,
{
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.map.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.map.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.map.get_mut(key)
    }

    /// Inserts or overwrites, returning the previous value.
    ///
    /// Does not grow the map, callers adding a new key `reserve(1)` first.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.map.remove(key)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.map.remove_entry(key)
    }

    /// Makes room for `additional` more entries without crossing the load factor.
    pub fn reserve(&mut self, additional: usize) {
        self.grow_for(self.map.len().saturating_add(additional));
    }

    pub fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit();
    }

    fn grow_for(&mut self, len: usize) {
        if len <= self.threshold() {
            return;
        }

        let current = self.map.capacity();
        let target = slots_for(len, self.load_factor).max(current.saturating_mul(2));
        log::debug!(
            "growing base map from {current} to {target} slots for {len} entries (load factor {})",
            self.load_factor
        );

        self.map.reserve(target - self.map.len());
    }
}

impl<K, V> PartialEq for BaseMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

#[cfg(test)]
mod tests {
    use super::BaseMap;

    #[test]
    fn should_presize_for_load_factor() {
        let map: BaseMap<u32, u32> = BaseMap::with_capacity(100, 0.5);
        assert!(map.capacity() >= 200);
        assert_eq!(map.load_factor(), 0.5);
    }

    #[test]
    fn should_keep_entries_below_threshold() {
        let mut map = BaseMap::with_capacity(0, 0.5);
        for i in 0..1000 {
            map.reserve(1);
            map.insert(i, i * 2);
            assert!(map.len() as f64 <= map.capacity() as f64 * 0.5 + 1.0);
        }

        assert_eq!(map.len(), 1000);
        assert_eq!(map.get(&500), Some(&1000));
    }

    #[test]
    fn should_return_previous_value_on_overwrite() {
        let mut map = BaseMap::new();
        assert_eq!(map.insert("a", 1), None);
        assert_eq!(map.insert("a", 2), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove("a"), Some(2));
        assert!(map.is_empty());
    }

    #[test]
    fn should_reserve_additional_entries() {
        let mut map: BaseMap<u32, u32> = BaseMap::new();
        map.reserve(50);
        assert!(map.capacity() as f64 * map.load_factor() as f64 >= 50.0 - 1.0);
    }
}
