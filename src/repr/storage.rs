/*!
# Edge Storage

This module defines the storage backing every graph variant.

Adjacency maps do not hold edge attribute records directly. They hold
[`EdgeId`] values into a side table ([`EdgeTable`]) owning one record per
edge. Mirrored adjacency entries (`adj[u][v]` / `adj[v][u]`, resp.
`succ[u][v]` / `pred[v][u]`) carry the same id, which realizes shared
attribute-record identity without aliasing.

The per-neighbor payload of an adjacency entry is abstracted by the
[`EdgeMult`] policy:

- [`Simple`] — the payload is a single [`EdgeId`]; parallel edges are
  forbidden.
- [`Multi`] — the payload is a keyed sub-map from edge key to [`EdgeId`];
  parallel edges are distinguished by key.
*/

use std::cell::Ref;

use smallvec::SmallVec;

use crate::{
    attr::{Attrs, SharedAttrs},
    key::Key,
    map::KeyedMap,
};

/// Identifier of an edge attribute record in the [`EdgeTable`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EdgeId(u32);

impl EdgeId {
    #[inline(always)]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Side table holding a [`SharedAttrs`] handle for every live edge.
///
/// Slots of removed edges are kept on a free list and reused. Handles may
/// be aliased by other tables (subgraph views share records with their
/// parent), so copying a table goes through [`EdgeTable::deep_clone`].
#[derive(Debug, Default)]
pub struct EdgeTable {
    slots: Vec<Option<SharedAttrs>>,
    free: Vec<EdgeId>,
    live: usize,
}

impl EdgeTable {
    /// Stores `attrs` under a fresh handle and returns the id of the new
    /// record.
    pub fn alloc(&mut self, attrs: Attrs) -> EdgeId {
        self.adopt(SharedAttrs::new(attrs))
    }

    /// Stores an existing handle, aliasing whatever record it points to.
    pub fn adopt(&mut self, handle: SharedAttrs) -> EdgeId {
        self.live += 1;
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(handle);
            id
        } else {
            let id = EdgeId(self.slots.len() as u32);
            self.slots.push(Some(handle));
            id
        }
    }

    /// Returns the handle stored under `id`.
    ///
    /// # Panics
    /// Panics if `id` refers to a released record.
    pub fn handle(&self, id: EdgeId) -> &SharedAttrs {
        self.slots[id.index()].as_ref().expect("live edge id")
    }

    /// Borrows the record stored under `id` for reading.
    pub fn attrs(&self, id: EdgeId) -> Ref<'_, Attrs> {
        self.handle(id).borrow()
    }

    /// Merges `attrs` into the record stored under `id`.
    pub fn merge(&mut self, id: EdgeId, attrs: &Attrs) {
        self.handle(id).borrow_mut().merge(attrs);
    }

    /// Releases the slot stored under `id` and returns its handle.
    pub fn release(&mut self, id: EdgeId) -> SharedAttrs {
        let handle = self.slots[id.index()].take().expect("live edge id");
        self.free.push(id);
        self.live -= 1;
        handle
    }

    /// Returns the number of live records, i.e. the number of edges.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no edge is stored.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Releases every record.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }

    /// Returns a table of detached record copies under the same ids.
    pub fn deep_clone(&self) -> Self {
        Self {
            slots: self
                .slots
                .iter()
                .map(|slot| slot.as_ref().map(SharedAttrs::deep_clone))
                .collect(),
            free: self.free.clone(),
            live: self.live,
        }
    }
}

/// Entries of one adjacency payload: `(edge key, id)` pairs.
///
/// Simple payloads have exactly one entry with no key.
pub type SlotEntries = SmallVec<[(Option<Key>, EdgeId); 1]>;

/// Policy deciding how many edges one neighbor entry can carry.
///
/// Implemented by [`Simple`] and [`Multi`]. Graph variants are
/// parameterized by this trait the same way they are parameterized by
/// their direction marker; all edge-editing logic is shared through it.
pub trait EdgeMult: Copy + Default + std::fmt::Debug + 'static {
    /// `true` if parallel edges are supported.
    const MULTI: bool;

    /// The per-neighbor adjacency payload.
    type Slot: Clone + std::fmt::Debug;

    /// Creates a payload holding a single edge.
    fn single(key: Option<Key>, id: EdgeId) -> Self::Slot;

    /// Looks up an edge id in the payload.
    ///
    /// With `key = None`, any edge of the payload matches; multi payloads
    /// then report their most recently inserted edge.
    fn find(slot: &Self::Slot, key: Option<&Key>) -> Option<EdgeId>;

    /// Adds another edge to the payload. Only called for multi payloads;
    /// simple payloads never hold more than one edge.
    fn insert(slot: &mut Self::Slot, key: Option<Key>, id: EdgeId);

    /// Removes an edge from the payload and returns its key and id.
    ///
    /// With `key = None`, the most recently inserted edge is removed.
    fn remove(slot: &mut Self::Slot, key: Option<&Key>) -> Option<(Option<Key>, EdgeId)>;

    /// Returns the number of edges in the payload.
    fn len(slot: &Self::Slot) -> usize;

    /// Returns the `i`-th edge of the payload in insertion order.
    fn entry_at(slot: &Self::Slot, i: usize) -> Option<(Option<&Key>, EdgeId)>;

    /// Returns every edge of the payload as owned entries.
    fn entries(slot: &Self::Slot) -> SlotEntries {
        (0..)
            .map_while(|i| Self::entry_at(slot, i))
            .map(|(k, id)| (k.cloned(), id))
            .collect()
    }

    /// Chooses the key for an insertion without an explicit key: the
    /// smallest non-negative integer not used by the payload.
    ///
    /// Simple payloads have no keys and return `None`.
    fn next_key(slot: Option<&Self::Slot>) -> Option<Key>;
}

/// Marker type for simple variants: one edge per neighbor entry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Simple;

/// Marker type for multi variants: a keyed sub-map per neighbor entry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Multi;

impl EdgeMult for Simple {
    const MULTI: bool = false;

    type Slot = EdgeId;

    fn single(_key: Option<Key>, id: EdgeId) -> Self::Slot {
        id
    }

    fn find(slot: &Self::Slot, _key: Option<&Key>) -> Option<EdgeId> {
        Some(*slot)
    }

    fn insert(_slot: &mut Self::Slot, _key: Option<Key>, _id: EdgeId) {
        unreachable!("simple payloads hold exactly one edge");
    }

    fn remove(slot: &mut Self::Slot, _key: Option<&Key>) -> Option<(Option<Key>, EdgeId)> {
        Some((None, *slot))
    }

    fn len(_slot: &Self::Slot) -> usize {
        1
    }

    fn entry_at(slot: &Self::Slot, i: usize) -> Option<(Option<&Key>, EdgeId)> {
        (i == 0).then_some((None, *slot))
    }

    fn next_key(_slot: Option<&Self::Slot>) -> Option<Key> {
        None
    }
}

impl EdgeMult for Multi {
    const MULTI: bool = true;

    type Slot = KeyedMap<Key, EdgeId>;

    fn single(key: Option<Key>, id: EdgeId) -> Self::Slot {
        let mut slot = KeyedMap::new();
        slot.insert(key.unwrap_or(Key::Int(0)), id);
        slot
    }

    fn find(slot: &Self::Slot, key: Option<&Key>) -> Option<EdgeId> {
        match key {
            Some(k) => slot.get(k).copied(),
            None => slot.last().map(|(_, id)| *id),
        }
    }

    fn insert(slot: &mut Self::Slot, key: Option<Key>, id: EdgeId) {
        slot.insert(key.unwrap_or(Key::Int(0)), id);
    }

    fn remove(slot: &mut Self::Slot, key: Option<&Key>) -> Option<(Option<Key>, EdgeId)> {
        let key = match key {
            Some(k) => k.clone(),
            None => slot.last()?.0.clone(),
        };
        let id = slot.remove(&key)?;
        Some((Some(key), id))
    }

    fn len(slot: &Self::Slot) -> usize {
        slot.len()
    }

    fn entry_at(slot: &Self::Slot, i: usize) -> Option<(Option<&Key>, EdgeId)> {
        slot.get_index(i).map(|(k, id)| (Some(k), *id))
    }

    fn next_key(slot: Option<&Self::Slot>) -> Option<Key> {
        let Some(slot) = slot else {
            return Some(Key::Int(0));
        };

        let mut candidate = 0;
        while slot.contains(&Key::Int(candidate)) {
            candidate += 1;
        }
        Some(Key::Int(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn table_reuses_released_slots() {
        let mut table = EdgeTable::default();
        let a = table.alloc(attrs! { "w" => 1 });
        let b = table.alloc(attrs! { "w" => 2 });
        assert_eq!(table.len(), 2);

        let released = table.release(a);
        assert_eq!(released.into_attrs(), attrs! { "w" => 1 });
        assert_eq!(table.len(), 1);

        let c = table.alloc(Attrs::new());
        assert_eq!(c, a);
        assert!(table.attrs(c).is_empty());
        assert_eq!(*table.attrs(b), attrs! { "w" => 2 });
    }

    #[test]
    fn adopted_handles_alias_their_source() {
        let mut table = EdgeTable::default();
        let id = table.alloc(attrs! { "w" => 1 });

        let mut view = EdgeTable::default();
        let view_id = view.adopt(table.handle(id).clone());
        table.merge(id, &attrs! { "w" => 7 });

        assert!(SharedAttrs::ptr_eq(table.handle(id), view.handle(view_id)));
        assert_eq!(view.attrs(view_id).get("w"), Some(&crate::attr::Value::Int(7)));

        // a deep clone of the view detaches its records
        let detached = view.deep_clone();
        assert!(!SharedAttrs::ptr_eq(table.handle(id), detached.handle(view_id)));
    }

    #[test]
    fn multi_auto_keys_fill_gaps() {
        let mut table = EdgeTable::default();
        let mut slot = Multi::single(Multi::next_key(None), table.alloc(Attrs::new()));
        for _ in 0..2 {
            let key = Multi::next_key(Some(&slot));
            Multi::insert(&mut slot, key, table.alloc(Attrs::new()));
        }

        // Keys 0, 1, 2 assigned; freeing 1 makes it the next candidate
        assert_eq!(Multi::len(&slot), 3);
        Multi::remove(&mut slot, Some(&Key::Int(1)));
        assert_eq!(Multi::next_key(Some(&slot)), Some(Key::Int(1)));
    }

    #[test]
    fn multi_remove_without_key_takes_last() {
        let mut table = EdgeTable::default();
        let first = table.alloc(Attrs::new());
        let second = table.alloc(Attrs::new());

        let mut slot = Multi::single(Some(Key::Int(0)), first);
        Multi::insert(&mut slot, Some(Key::Int(1)), second);

        let (key, id) = Multi::remove(&mut slot, None).unwrap();
        assert_eq!(key, Some(Key::Int(1)));
        assert_eq!(id, second);
    }
}
