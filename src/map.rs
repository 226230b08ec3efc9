/*!
# Keyed Maps

This module provides [`KeyedMap`], the associative container every graph
variant is built on.

- Iteration follows insertion order; removal keeps the order of the
  remaining entries.
- The hashing policy is pluggable through the `S: BuildHasher` parameter and
  defaults to [`FxBuildHasher`].
- Every structural mutation (inserting a new key, removing one, clearing)
  bumps a version counter. Borrowing iterators cannot observe mutation, but
  detached [`MapCursor`]s can: advancing a cursor created before a
  structural mutation fails with [`StaleCursor`].
*/

use std::hash::{BuildHasher, Hash};

use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use thiserror::Error;

/// Error returned when a [`MapCursor`] is advanced after the underlying map
/// changed structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("map changed during iteration")]
pub struct StaleCursor;

/// Iterator over the keys of a [`KeyedMap`].
pub type MapKeys<'a, K, V> = indexmap::map::Keys<'a, K, V>;

/// Iterator over the values of a [`KeyedMap`].
pub type MapValues<'a, K, V> = indexmap::map::Values<'a, K, V>;

/// Iterator over the entries of a [`KeyedMap`].
pub type MapEntries<'a, K, V> = indexmap::map::Iter<'a, K, V>;

/// An insertion-ordered map with a structural version counter.
#[derive(Clone, Debug)]
pub struct KeyedMap<K, V, S = FxBuildHasher> {
    inner: IndexMap<K, V, S>,
    version: u64,
}

impl<K, V, S: Default> Default for KeyedMap<K, V, S> {
    fn default() -> Self {
        Self {
            inner: IndexMap::with_hasher(S::default()),
            version: 0,
        }
    }
}

impl<K, V, S: Default> KeyedMap<K, V, S> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with space for at least `n` entries.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            inner: IndexMap::with_capacity_and_hasher(n, S::default()),
            version: 0,
        }
    }
}

impl<K, V, S> KeyedMap<K, V, S> {
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the structural version of the map.
    ///
    /// The version increases on every insertion of a new key, every removal,
    /// and every clear. Replacing the value of an existing key is not a
    /// structural mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> MapKeys<'_, K, V> {
        self.inner.keys()
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> MapValues<'_, K, V> {
        self.inner.values()
    }

    /// Iterates over `(key, value)` entries in insertion order.
    pub fn entries(&self) -> MapEntries<'_, K, V> {
        self.inner.iter()
    }

    /// Returns the entry at position `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.inner.get_index(index)
    }

    /// Returns the most recently inserted entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.inner.last()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        if !self.inner.is_empty() {
            self.version += 1;
        }
        self.inner.clear();
    }

    /// Creates a detached cursor positioned before the first entry.
    ///
    /// Unlike the borrowing iterators, a cursor does not borrow the map: it
    /// captures the current version and is handed the map again on every
    /// advance, failing with [`StaleCursor`] once the map changed.
    pub fn cursor(&self) -> MapCursor {
        MapCursor {
            pos: 0,
            version: self.version,
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> KeyedMap<K, V, S> {
    /// Returns a reference to the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    /// Returns the value stored under `key`, or `default` if absent.
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.inner.get_mut(key)
    }

    /// Returns the position, key, and value stored under `key`.
    pub fn get_full(&self, key: &K) -> Option<(usize, &K, &V)> {
        self.inner.get_full(key)
    }

    /// Returns the position of `key` in insertion order.
    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.inner.get_index_of(key)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Inserts `value` under `key`.
    ///
    /// Returns the previous value if the key was present; only the insertion
    /// of a *new* key counts as a structural mutation.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let prev = self.inner.insert(key, value);
        if prev.is_none() {
            self.version += 1;
        }
        prev
    }

    /// Removes the entry stored under `key` and returns its value.
    ///
    /// The insertion order of the remaining entries is preserved.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let prev = self.inner.shift_remove(key);
        if prev.is_some() {
            self.version += 1;
        }
        prev
    }
}

impl<K: Hash + Eq, V: PartialEq, S: BuildHasher> PartialEq for KeyedMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V, S> IntoIterator for KeyedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a KeyedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapEntries<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> FromIterator<(K, V)> for KeyedMap<K, V, S> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for KeyedMap<K, V, S> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// A detached position into a [`KeyedMap`].
///
/// Created by [`KeyedMap::cursor`]. Cursors are lazy and may be partially
/// consumed; the map may be mutated through other handles between advances,
/// in which case the next advance reports [`StaleCursor`] instead of
/// yielding entries from a map that no longer looks like the one the cursor
/// was created for.
#[derive(Debug, Clone, Copy)]
pub struct MapCursor {
    pos: usize,
    version: u64,
}

impl MapCursor {
    /// Advances the cursor over `map`.
    ///
    /// Returns `Ok(None)` once the map is exhausted and `Err(StaleCursor)`
    /// if `map` structurally changed since the cursor was created.
    pub fn next<'a, K, V, S>(
        &mut self,
        map: &'a KeyedMap<K, V, S>,
    ) -> Result<Option<(&'a K, &'a V)>, StaleCursor> {
        if self.version != map.version {
            return Err(StaleCursor);
        }

        let entry = map.inner.get_index(self.pos);
        if entry.is_some() {
            self.pos += 1;
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Map = KeyedMap<String, i32>;

    fn sample() -> Map {
        let mut map = Map::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.insert("c".to_string(), 3);
        map
    }

    #[test]
    fn insertion_order() {
        let map = sample();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn removal_preserves_order() {
        let mut map = sample();
        map.insert("d".to_string(), 4);
        map.remove(&"b".to_string());

        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["a", "c", "d"]);
    }

    #[test]
    fn version_counts_structural_mutations() {
        let mut map = Map::new();
        let v0 = map.version();

        map.insert("a".to_string(), 1);
        assert_eq!(map.version(), v0 + 1);

        // Replacing a value is not structural
        map.insert("a".to_string(), 2);
        assert_eq!(map.version(), v0 + 1);

        map.remove(&"a".to_string());
        assert_eq!(map.version(), v0 + 2);

        // Removing a missing key is not structural
        map.remove(&"a".to_string());
        assert_eq!(map.version(), v0 + 2);
    }

    #[test]
    fn cursor_walks_entries() {
        let map = sample();
        let mut cursor = map.cursor();

        let mut seen = Vec::new();
        while let Some((k, v)) = cursor.next(&map).unwrap() {
            seen.push((k.clone(), *v));
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], ("a".to_string(), 1));

        // Exhausted cursors stay exhausted
        assert_eq!(cursor.next(&map).unwrap(), None);
    }

    #[test]
    fn cursor_fails_after_mutation() {
        let mut map = sample();
        let mut cursor = map.cursor();

        assert!(cursor.next(&map).unwrap().is_some());

        map.insert("d".to_string(), 4);
        assert_eq!(cursor.next(&map), Err(StaleCursor));

        // A fresh cursor works again
        let mut cursor = map.cursor();
        assert!(cursor.next(&map).unwrap().is_some());
    }

    #[test]
    fn value_replacement_keeps_cursors_valid() {
        let mut map = sample();
        let mut cursor = map.cursor();

        map.insert("a".to_string(), 100);
        assert_eq!(
            cursor.next(&map).unwrap().map(|(k, v)| (k.as_str(), *v)),
            Some(("a", 100))
        );
    }

    #[test]
    fn clone_is_independent() {
        let map = sample();
        let mut copy = map.clone();
        copy.insert("d".to_string(), 4);
        copy.remove(&"a".to_string());

        assert_eq!(map.len(), 3);
        assert!(map.contains(&"a".to_string()));
    }
}
