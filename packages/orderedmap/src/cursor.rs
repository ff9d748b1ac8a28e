use std::hash::Hash;
use std::marker::PhantomData;

use crate::iter::{EntryTraversal, KeyTraversal, Traversal, ValueTraversal};
use crate::OrderedMap;

/// A traversal over an `OrderedMap` that can remove the entry it last yielded.
///
/// Unlike [`Iter`](crate::Iter), a cursor borrows the map mutably, so its items only live
/// until the next call on the cursor. After [`Cursor::remove`] the following entries shift
/// one position to the left and the traversal continues with the entry that moved into the
/// freed position.
///
/// # Example
/// ```
/// use orderedmap::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
/// map.insert("c", 3);
///
/// let mut cursor = map.entries_cursor();
/// while let Some((_, value)) = cursor.next() {
///     if *value % 2 == 0 {
///         cursor.remove();
///     }
/// }
///
/// assert_eq!(map.to_string(), "{a=1, c=3}");
/// ```
pub struct Cursor<'a, K, V, T> {
    map: &'a mut OrderedMap<K, V>,
    next_index: usize,
    current: Option<usize>,
    _traversal: PhantomData<T>,
}

/// Cursor yielding `(&K, &V)` pairs.
pub type EntriesCursor<'a, K, V> = Cursor<'a, K, V, EntryTraversal>;

/// Cursor yielding `&K`.
pub type KeysCursor<'a, K, V> = Cursor<'a, K, V, KeyTraversal>;

/// Cursor yielding `&V`.
pub type ValuesCursor<'a, K, V> = Cursor<'a, K, V, ValueTraversal>;

impl<'a, K, V, T> Cursor<'a, K, V, T> {
    pub(crate) fn new(map: &'a mut OrderedMap<K, V>) -> Self {
        Cursor {
            map,
            next_index: 0,
            current: None,
            _traversal: PhantomData,
        }
    }

    /// Moves the cursor back to the first position.
    pub fn reset(&mut self) {
        self.next_index = 0;
        self.current = None;
    }

    /// Whether there are positions left in the order index.
    ///
    /// Keys without a value are only skipped when reached, so this can return `true` right
    /// before [`Cursor::next`] returns `None`.
    pub fn has_next(&self) -> bool {
        self.next_index < self.map.keys.len()
    }

    /// Position in the order index of the entry last yielded, if any.
    pub fn index(&self) -> Option<usize> {
        self.current
    }
}

impl<'a, K, V, T> Cursor<'a, K, V, T>
where
    K: Eq + Hash,
    T: Traversal<K, V>,
{
    /// Advances the cursor and returns the next item.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<T::Item<'_>> {
        while self.next_index < self.map.keys.len() {
            let index = self.next_index;
            self.next_index += 1;

            if self.map.base.contains_key(&self.map.keys[index]) {
                self.current = Some(index);
                let key = &self.map.keys[index];
                let value = self.map.base.get(key)?;
                return Some(T::project(key, value));
            }

            log::warn!("skipping key without a value at index {index} of the order index");
        }

        self.current = None;
        None
    }

    /// Removes the entry last returned by [`Cursor::next`] from the map.
    ///
    /// Returns `None` if nothing was yielded since the last removal or reset.
    pub fn remove(&mut self) -> Option<(K, V)> {
        let index = self.current.take()?;
        let key = self.map.keys.remove(index);
        self.next_index = index;

        self.map
            .base
            .remove(&key)
            .map(|value| (key, value))
    }
}

#[cfg(test)]
mod tests {
    use crate::OrderedMap;

    fn abc() -> OrderedMap<&'static str, i32> {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        map
    }

    #[test]
    fn should_remove_second_of_three_entries() {
        let mut map = abc();
        let mut cursor = map.entries_cursor();
        let mut position = 0;

        while let Some(_) = cursor.next() {
            position += 1;
            if position == 2 {
                assert_eq!(cursor.remove(), Some(("b", 2)));
            }
        }

        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn should_not_skip_after_removal() {
        let mut map = abc();
        let mut seen = Vec::new();
        let mut cursor = map.keys_cursor();

        while let Some(key) = cursor.next() {
            let key = *key;
            seen.push(key);
            if key == "a" {
                cursor.remove();
            }
        }

        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(map.to_string(), "{b=2, c=3}");
    }

    #[test]
    fn should_remove_consecutive_entries() {
        let mut map = abc();
        map.insert("d", 4);

        let mut seen = Vec::new();
        let mut cursor = map.values_cursor();
        while let Some(value) = cursor.next() {
            let value = *value;
            seen.push(value);
            if value == 2 || value == 3 {
                cursor.remove();
            }
        }

        // Every entry is visited exactly once.
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(map.to_string(), "{a=1, d=4}");
    }

    #[test]
    fn should_remove_every_entry() {
        let mut map = abc();
        let mut cursor = map.entries_cursor();
        let mut removed = Vec::new();

        while cursor.next().is_some() {
            removed.extend(cursor.remove());
        }

        assert_eq!(removed, vec![("a", 1), ("b", 2), ("c", 3)]);
        assert!(map.is_empty());
        assert_eq!(map.to_string(), "{}");
    }

    #[test]
    fn should_not_remove_without_current_entry() {
        let mut map = abc();
        let mut cursor = map.entries_cursor();

        assert_eq!(cursor.remove(), None);

        cursor.next();
        assert!(cursor.remove().is_some());
        assert_eq!(cursor.remove(), None);

        assert_eq!(map.len(), 2);
    }

    #[test]
    fn should_restart_after_reset() {
        let mut map = abc();
        let mut cursor = map.keys_cursor();

        assert_eq!(cursor.next(), Some(&"a"));
        assert_eq!(cursor.next(), Some(&"b"));
        assert_eq!(cursor.index(), Some(1));

        cursor.reset();
        assert_eq!(cursor.index(), None);
        assert!(cursor.has_next());
        assert_eq!(cursor.next(), Some(&"a"));
    }

    #[test]
    fn should_stop_at_end() {
        let mut map = abc();
        let mut cursor = map.values_cursor();

        assert_eq!(cursor.next(), Some(&1));
        assert_eq!(cursor.next(), Some(&2));
        assert_eq!(cursor.next(), Some(&3));
        assert!(!cursor.has_next());
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.remove(), None);
    }

    #[test]
    fn should_skip_keys_without_value() {
        let mut map = abc();
        map.ordered_keys_mut().insert(0, "ghost");

        let mut cursor = map.keys_cursor();
        assert_eq!(cursor.next(), Some(&"a"));
        assert_eq!(cursor.index(), Some(1));
        assert_eq!(cursor.remove(), Some(("a", 1)));
        assert_eq!(cursor.next(), Some(&"b"));

        assert_eq!(map.ordered_keys(), &["ghost", "b", "c"]);
    }
}
