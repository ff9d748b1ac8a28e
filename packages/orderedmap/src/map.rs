use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::base::BaseMap;
use crate::cursor::{EntriesCursor, KeysCursor, ValuesCursor};
use crate::iter::{Entries, IntoIter, Keys, Values};
use crate::options::{OptionsError, OrderedMapOptions, DEFAULT_LOAD_FACTOR};

/// A map that preserves the insertion order of keys.
///
/// Overwriting the value of an existing key keeps its position, only removing the key
/// and inserting it again moves it to the end.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    pub(crate) base: BaseMap<K, V>,
    pub(crate) keys: Vec<K>,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates a new, empty `OrderedMap`.
    pub fn new() -> Self {
        OrderedMap {
            base: BaseMap::new(),
            keys: Vec::new(),
        }
    }

    /// Creates an empty `OrderedMap` with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            base: BaseMap::with_capacity(capacity, DEFAULT_LOAD_FACTOR),
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Creates an empty `OrderedMap` with room for `capacity` entries that grows once the
    /// ratio of entries to slots exceeds `load_factor`.
    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f32,
    ) -> Result<Self, OptionsError> {
        Self::with_options(
            OrderedMapOptions::new()
                .initial_capacity(capacity)
                .load_factor(load_factor),
        )
    }

    /// Creates an empty `OrderedMap` from the given options.
    pub fn with_options(options: OrderedMapOptions) -> Result<Self, OptionsError> {
        options.validate()?;

        let capacity = options.get_initial_capacity();
        Ok(OrderedMap {
            base: BaseMap::with_capacity(capacity, options.get_load_factor()),
            keys: Vec::with_capacity(capacity),
        })
    }

    /// Returns the number of key-value pairs in the map.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Checks if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Number of entries the map can hold before growing.
    pub fn capacity(&self) -> usize {
        let base = (self.base.capacity() as f64 * self.base.load_factor() as f64) as usize;
        base.min(self.keys.capacity())
    }

    /// Returns the load factor of the underlying hash map.
    pub fn load_factor(&self) -> f32 {
        self.base.load_factor()
    }

    /// Returns the keys in their current order.
    pub fn ordered_keys(&self) -> &[K] {
        &self.keys
    }

    /// Returns the order index itself.
    ///
    /// The keys can be inspected or reordered freely. Adding or removing keys through this
    /// reference is not checked: every key in it must also be in the map and the other way
    /// around, use [`OrderedMap::check_consistency`] to verify it.
    pub fn ordered_keys_mut(&mut self) -> &mut Vec<K> {
        &mut self.keys
    }

    /// Returns an iterator over the `(key, value)` pairs in order.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries::new(&self.keys, &self.base)
    }

    /// Returns an iterator over the `(key, value)` pairs in order.
    pub fn iter(&self) -> Entries<'_, K, V> {
        self.entries()
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(&self.keys, &self.base)
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(&self.keys, &self.base)
    }

    /// Returns a cursor over the `(key, value)` pairs that can remove the current entry.
    pub fn entries_cursor(&mut self) -> EntriesCursor<'_, K, V> {
        EntriesCursor::new(self)
    }

    /// Returns a cursor over the keys that can remove the current entry.
    pub fn keys_cursor(&mut self) -> KeysCursor<'_, K, V> {
        KeysCursor::new(self)
    }

    /// Returns a cursor over the values that can remove the current entry.
    pub fn values_cursor(&mut self) -> ValuesCursor<'_, K, V> {
        ValuesCursor::new(self)
    }

    /// Remove all the entries in the map.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.base.clear();
    }

    /// Sort the keys using the given comparator, values are not touched.
    pub fn sort_keys_by<F>(&mut self, compare: F)
    where
        F: FnMut(&K, &K) -> Ordering,
    {
        self.keys.sort_by(compare);
    }

    /// Moves the keys so that the key currently at `permutation[i]` ends at position `i`.
    ///
    /// The map is left untouched if `permutation` is not a permutation of the positions.
    pub fn reorder(&mut self, permutation: &[usize]) -> Result<(), ReorderError> {
        if let Err(err) = check_permutation(permutation, self.keys.len()) {
            log::debug!("rejected reorder: {err}");
            return Err(err);
        }

        let mut slots = std::mem::take(&mut self.keys)
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>();

        self.keys = permutation
            .iter()
            .filter_map(|&index| slots[index].take())
            .collect();

        Ok(())
    }
}

fn check_permutation(permutation: &[usize], len: usize) -> Result<(), ReorderError> {
    if permutation.len() != len {
        return Err(ReorderError::LengthMismatch {
            expected: len,
            actual: permutation.len(),
        });
    }

    let mut seen = vec![false; len];
    for &index in permutation {
        match seen.get_mut(index) {
            None => return Err(ReorderError::IndexOutOfBounds(index)),
            Some(true) => return Err(ReorderError::DuplicateIndex(index)),
            Some(slot) => *slot = true,
        }
    }

    Ok(())
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash,
{
    /// Retrieves a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.base.get(key)
    }

    /// Retrieves a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.base.get_mut(key)
    }

    /// Returns the reference to the element with the key at the given position.
    pub fn get_index(&self, index: usize) -> Option<&V> {
        let key = self.keys.get(index)?;
        self.base.get(key)
    }

    /// Returns the mutable reference to the element with the key at the given position.
    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut V> {
        let key = self.keys.get(index)?;
        self.base.get_mut(key)
    }

    /// Returns the key and value at the given position.
    pub fn get_key_index(&self, index: usize) -> Option<(&K, &V)> {
        let key = self.keys.get(index)?;
        self.base.get(key).map(|value| (key, value))
    }

    /// Returns the position of the key in the order index.
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.keys.iter().position(|k| k.borrow() == key)
    }

    /// Returns the first entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.get_key_index(0)
    }

    /// Returns the last entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.get_key_index(self.keys.len().checked_sub(1)?)
    }

    /// Returns `true` if the map contains the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        self.base.contains_key(key)
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// This is a linear scan of the order index.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        if let Some(index) = self.index_of(key) {
            self.keys.remove(index);
        }

        self.base.remove(key)
    }

    /// Removes a key from the map, returning the stored key and value if it was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        if let Some(index) = self.index_of(key) {
            self.keys.remove(index);
        }

        self.base.remove_entry(key)
    }

    /// Removes the element at the given position.
    pub fn remove_index(&mut self, index: usize) -> Option<(K, V)> {
        if index >= self.keys.len() {
            return None;
        }

        let key = self.keys.remove(index);
        self.base.remove(&key).map(|value| (key, value))
    }

    /// Remove all elements that does not matches the predicate.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let base = &mut self.base;
        self.keys.retain(|key| match base.get_mut(key) {
            Some(value) => {
                if f(key, value) {
                    true
                } else {
                    base.remove(key);
                    false
                }
            }
            None => true,
        });
    }

    /// Reserves room for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
        self.base.reserve(additional);
    }

    /// Shrinks the storage as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.keys.shrink_to_fit();
        self.base.shrink_to_fit();
    }

    /// Checks that the order index and the map hold the same keys exactly once.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let mut seen = HashSet::with_capacity(self.keys.len());

        for (index, key) in self.keys.iter().enumerate() {
            if !seen.insert(key) {
                return Err(ConsistencyError::DuplicateKey(index));
            }

            if !self.base.contains_key(key) {
                return Err(ConsistencyError::MissingBinding(index));
            }
        }

        if self.keys.len() != self.base.len() {
            return Err(ConsistencyError::LengthMismatch {
                order: self.keys.len(),
                base: self.base.len(),
            });
        }

        Ok(())
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    /// Returns `true` if any key is mapped to `value`.
    pub fn contains_value(&self, value: &V) -> bool {
        self.base.values().any(|v| v == value)
    }

    /// Returns the first key, in order, that is mapped to `value`.
    pub fn find_key(&self, value: &V) -> Option<&K> {
        self.entries().find(|(_, v)| *v == value).map(|(k, _)| k)
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Ord,
{
    /// Sort the keys of this map.
    pub fn sort_keys(&mut self) {
        self.keys.sort();
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Inserts a key-value pair into the map, returning the previous value of the key.
    ///
    /// A new key is appended at the end of the order, an existing key keeps its position
    /// and only has its value replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if !self.base.contains_key(&key) {
            self.keys.push(key.clone());
            self.base.reserve(1);
        }

        self.base.insert(key, value)
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Debug for OrderedMap<K, V>
where
    K: Debug + Eq + Hash,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl<K, V> Display for OrderedMap<K, V>
where
    K: Display + Eq + Hash,
    V: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_empty() {
            return write!(f, "{{}}");
        }

        write!(f, "{{")?;

        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            match self.base.get(key) {
                Some(value) => write!(f, "{key}={value}")?,
                None => {
                    log::warn!("formatting key `{key}` without a value");
                    write!(f, "{key}=<missing>")?
                }
            }
        }

        write!(f, "}}")
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Entries<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V>
where
    K: Eq + Hash,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.keys, self.base)
    }
}

impl<K, V> Extend<(K, V)> for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V> PartialEq for OrderedMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.keys == other.keys
    }
}

impl<K, V> Eq for OrderedMap<K, V>
where
    K: Eq + Hash,
    V: Eq,
{
}

/// A permutation passed to [`OrderedMap::reorder`] that does not match the keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    LengthMismatch { expected: usize, actual: usize },
    IndexOutOfBounds(usize),
    DuplicateIndex(usize),
}

impl Display for ReorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReorderError::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} positions but got {actual}")
            }
            ReorderError::IndexOutOfBounds(index) => write!(f, "position {index} is out of bounds"),
            ReorderError::DuplicateIndex(index) => write!(f, "position {index} is repeated"),
        }
    }
}

impl std::error::Error for ReorderError {}

/// A mismatch between the order index and the stored entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    LengthMismatch { order: usize, base: usize },
    DuplicateKey(usize),
    MissingBinding(usize),
}

impl Display for ConsistencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsistencyError::LengthMismatch { order, base } => {
                write!(f, "order index has {order} keys but the map has {base} entries")
            }
            ConsistencyError::DuplicateKey(index) => {
                write!(f, "key at index {index} appears more than once in the order index")
            }
            ConsistencyError::MissingBinding(index) => {
                write!(f, "key at index {index} of the order index has no value")
            }
        }
    }
}

impl std::error::Error for ConsistencyError {}
