//! A hash map that remembers the order in which keys were first inserted.
//!
//! ```
//! use orderedmap::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.insert("a", 1);
//! map.insert("b", 2);
//! map.insert("c", 3);
//! map.remove("b");
//! map.insert("d", 4);
//!
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "c", "d"]);
//! assert_eq!(map.to_string(), "{a=1, c=3, d=4}");
//! ```

mod base;
mod cursor;
mod iter;
mod map;
mod options;

pub use {cursor::*, iter::*, map::*, options::*};
