use std::hash::Hash;
use std::marker::PhantomData;

use crate::base::BaseMap;

/// What a traversal yields for each `(key, value)` pair it visits.
///
/// Implemented by [`EntryTraversal`], [`KeyTraversal`] and [`ValueTraversal`], it lets
/// [`Iter`] and [`Cursor`](crate::Cursor) share the same walk over the order index.
pub trait Traversal<K, V> {
    type Item<'a>
    where
        K: 'a,
        V: 'a;

    fn project<'a>(key: &'a K, value: &'a V) -> Self::Item<'a>;
}

/// Yields `(&K, &V)`.
#[derive(Debug, Clone, Copy)]
pub struct EntryTraversal;

/// Yields `&K`.
#[derive(Debug, Clone, Copy)]
pub struct KeyTraversal;

/// Yields `&V`.
#[derive(Debug, Clone, Copy)]
pub struct ValueTraversal;

impl<K, V> Traversal<K, V> for EntryTraversal {
    type Item<'a> = (&'a K, &'a V) where K: 'a, V: 'a;

    fn project<'a>(key: &'a K, value: &'a V) -> Self::Item<'a> {
        (key, value)
    }
}

impl<K, V> Traversal<K, V> for KeyTraversal {
    type Item<'a> = &'a K where K: 'a, V: 'a;

    fn project<'a>(key: &'a K, _value: &'a V) -> Self::Item<'a> {
        key
    }
}

impl<K, V> Traversal<K, V> for ValueTraversal {
    type Item<'a> = &'a V where K: 'a, V: 'a;

    fn project<'a>(_key: &'a K, value: &'a V) -> Self::Item<'a> {
        value
    }
}

/// An iterator over an `OrderedMap` in key order.
pub struct Iter<'a, K, V, T> {
    keys: std::slice::Iter<'a, K>,
    base: &'a BaseMap<K, V>,
    _traversal: PhantomData<T>,
}

/// Iterator over `(&K, &V)` pairs.
pub type Entries<'a, K, V> = Iter<'a, K, V, EntryTraversal>;

/// Iterator over `&K`.
pub type Keys<'a, K, V> = Iter<'a, K, V, KeyTraversal>;

/// Iterator over `&V`.
pub type Values<'a, K, V> = Iter<'a, K, V, ValueTraversal>;

impl<'a, K, V, T> Iter<'a, K, V, T> {
    pub(crate) fn new(keys: &'a [K], base: &'a BaseMap<K, V>) -> Self {
        Iter {
            keys: keys.iter(),
            base,
            _traversal: PhantomData,
        }
    }
}

impl<'a, K, V, T> Clone for Iter<'a, K, V, T> {
    fn clone(&self) -> Self {
        Iter {
            keys: self.keys.clone(),
            base: self.base,
            _traversal: PhantomData,
        }
    }
}

impl<'a, K, V, T> Iterator for Iter<'a, K, V, T>
where
    K: Eq + Hash + 'a,
    V: 'a,
    T: Traversal<K, V>,
{
    type Item = T::Item<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for key in self.keys.by_ref() {
            match self.base.get(key) {
                Some(value) => return Some(T::project(key, value)),
                None => log::warn!("skipping key without a value in the order index"),
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.keys.len()))
    }
}

impl<'a, K, V, T> DoubleEndedIterator for Iter<'a, K, V, T>
where
    K: Eq + Hash + 'a,
    V: 'a,
    T: Traversal<K, V>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some(key) = self.keys.next_back() {
            match self.base.get(key) {
                Some(value) => return Some(T::project(key, value)),
                None => log::warn!("skipping key without a value in the order index"),
            }
        }

        None
    }
}

/// An owning iterator over the entries of an `OrderedMap` in key order.
pub struct IntoIter<K, V> {
    keys: std::vec::IntoIter<K>,
    base: BaseMap<K, V>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(keys: Vec<K>, base: BaseMap<K, V>) -> Self {
        IntoIter {
            keys: keys.into_iter(),
            base,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V>
where
    K: Eq + Hash,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        for key in self.keys.by_ref() {
            match self.base.remove_entry(&key) {
                Some(entry) => return Some(entry),
                None => log::warn!("skipping key without a value in the order index"),
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.keys.len()))
    }
}

#[cfg(test)]
mod tests {
    use log::{LogLevel, MemoryLogger};

    use crate::OrderedMap;

    static LOGGER: MemoryLogger = MemoryLogger::new();

    #[test]
    fn should_iterate_entries_keys_and_values_in_order() {
        let mut map = OrderedMap::new();
        map.insert("z", 26);
        map.insert("a", 1);
        map.insert("m", 13);

        let entries = map.entries().collect::<Vec<_>>();
        assert_eq!(entries, vec![(&"z", &26), (&"a", &1), (&"m", &13)]);

        let keys = map.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let values = map.values().copied().collect::<Vec<_>>();
        assert_eq!(values, vec![26, 1, 13]);
    }

    #[test]
    fn should_restart_on_each_call() {
        let mut map = OrderedMap::new();
        map.insert(1, "one");
        map.insert(2, "two");

        let mut first = map.keys();
        assert_eq!(first.next(), Some(&1));

        let second = map.keys().copied().collect::<Vec<_>>();
        assert_eq!(second, vec![1, 2]);

        assert_eq!(first.next(), Some(&2));
        assert_eq!(first.next(), None);
    }

    #[test]
    fn should_iterate_backwards() {
        let mut map = OrderedMap::new();
        map.insert('a', 1);
        map.insert('b', 2);
        map.insert('c', 3);

        let values = map.values().rev().copied().collect::<Vec<_>>();
        assert_eq!(values, vec![3, 2, 1]);
    }

    #[test]
    fn should_skip_keys_without_value() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.ordered_keys_mut().insert(1, "ghost");

        let keys = map.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys, vec!["a", "b"]);

        let entries = map.into_iter().collect::<Vec<_>>();
        assert_eq!(entries, vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn should_consume_in_order() {
        let mut map = OrderedMap::new();
        map.insert(String::from("first"), 1);
        map.insert(String::from("second"), 2);
        map.insert(String::from("third"), 3);

        let mut iter = map.into_iter();
        assert_eq!(iter.next(), Some((String::from("first"), 1)));
        assert_eq!(iter.next(), Some((String::from("second"), 2)));
        assert_eq!(iter.next(), Some((String::from("third"), 3)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn should_warn_about_keys_without_value() {
        // The only test in this crate that installs a logger.
        log::set_logger(&LOGGER).unwrap();

        let mut map = OrderedMap::new();
        map.insert(1, 'a');
        map.ordered_keys_mut().push(2);

        assert_eq!(map.values().count(), 1);
        assert!(LOGGER.contains(LogLevel::Warn, "skipping key without a value"));
        assert!(LOGGER.contains(LogLevel::Warn, "orderedmap::iter"));
    }
}
