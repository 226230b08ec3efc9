/*!
# Graph Variants

This module defines the generic graph representation [`AdjGraph`] and the
four concrete variants built from it:

- [`Graph`] — simple undirected.
- [`DiGraph`] — simple directed.
- [`MultiGraph`] — undirected with parallel edges.
- [`MultiDiGraph`] — directed with parallel edges.

## Design

A graph holds a graph-level attribute record, a node map (node key to
attribute record), and one adjacency map per direction: undirected
variants use a single map whose mirrored entries (`adj[u][v]` and
`adj[v][u]`) carry the same [`EdgeId`]; directed variants keep `succ` and
`pred` consistent the same way. Edge attribute records live in the
[`EdgeTable`] side table as [`SharedAttrs`] handles, so mirrored entries
share one record by id, and [`AdjGraph::subgraph`] views alias their
parent's records by handle. [`Clone`] detaches every record.

All maps iterate in insertion order. The outer order of adjacency
traversal is node insertion order, the inner order is neighbor insertion
order.
*/

use std::{
    cell::{Ref, RefMut},
    marker::PhantomData,
};

use fxhash::FxHashSet;

use crate::{
    attr::{Attrs, SharedAttrs},
    convert,
    error::{GraphError, GraphResult},
    key::Key,
    map::{KeyedMap, MapCursor, MapKeys, StaleCursor},
    ops::*,
    testing::test_graph_variants,
};

use super::storage::{EdgeId, EdgeMult, EdgeTable, Multi, Simple};

/// Generic graph representation parameterized by a direction marker and an
/// edge-multiplicity policy.
///
/// Use the aliases [`Graph`], [`DiGraph`], [`MultiGraph`], and
/// [`MultiDiGraph`] instead of naming this type directly.
#[derive(Debug)]
pub struct AdjGraph<D, M>
where
    D: GraphDir,
    M: EdgeMult,
{
    attrs: SharedAttrs,
    nodes: KeyedMap<Key, SharedAttrs>,
    succ: KeyedMap<Key, KeyedMap<Key, M::Slot>>,
    pred: KeyedMap<Key, KeyedMap<Key, M::Slot>>,
    edges: EdgeTable,
    _dir: PhantomData<D>,
}

/// Cloning is a deep copy: every graph, node, and edge attribute record is
/// detached, so a clone of a [`AdjGraph::subgraph`] view no longer aliases
/// the parent graph.
impl<D: GraphDir, M: EdgeMult> Clone for AdjGraph<D, M> {
    fn clone(&self) -> Self {
        Self {
            attrs: self.attrs.deep_clone(),
            nodes: self
                .nodes
                .entries()
                .map(|(n, record)| (n.clone(), record.deep_clone()))
                .collect(),
            succ: self.succ.clone(),
            pred: self.pred.clone(),
            edges: self.edges.deep_clone(),
            _dir: PhantomData,
        }
    }
}

/// Simple undirected graph: at most one edge per unordered node pair.
pub type Graph = AdjGraph<Undirected, Simple>;

/// Simple directed graph: at most one edge per ordered node pair.
pub type DiGraph = AdjGraph<Directed, Simple>;

/// Undirected graph with parallel edges distinguished by edge key.
pub type MultiGraph = AdjGraph<Undirected, Multi>;

/// Directed graph with parallel edges distinguished by edge key.
pub type MultiDiGraph = AdjGraph<Directed, Multi>;

#[inline(always)]
fn directed<D: GraphDir>() -> bool {
    D::DIRECTION == GraphDirection::Directed
}

// ---------- Construction ----------

impl<D: GraphDir, M: EdgeMult> AdjGraph<D, M> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::with_graph_attrs(Attrs::new())
    }

    /// Creates an empty graph with the given graph-level attribute record.
    pub fn with_graph_attrs(attrs: Attrs) -> Self {
        Self {
            attrs: SharedAttrs::new(attrs),
            nodes: KeyedMap::new(),
            succ: KeyedMap::new(),
            pred: KeyedMap::new(),
            edges: EdgeTable::default(),
            _dir: PhantomData,
        }
    }

    /// Copy-constructs this variant from any other graph variant.
    ///
    /// Copying an undirected graph into a directed variant yields both
    /// orientations of every edge; copying parallel edges into a simple
    /// variant collapses them in encounter order. All attribute records are
    /// deep copies.
    ///
    /// # Examples
    /// ```
    /// use agraphs::prelude::*;
    ///
    /// let g = Graph::from_edges([(0, 1)]);
    /// let d = DiGraph::from_graph(&g);
    /// assert!(d.has_edge(&0.into(), &1.into()));
    /// assert!(d.has_edge(&1.into(), &0.into()));
    /// ```
    pub fn from_graph<GI: EdgeOps>(other: &GI) -> Self {
        convert::copy_into(other)
    }
}

impl<D: GraphDir, M: EdgeMult> Default for AdjGraph<D, M> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------- Internal plumbing ----------

impl<D: GraphDir, M: EdgeMult> AdjGraph<D, M> {
    fn slot(&self, u: &Key, v: &Key) -> Option<&M::Slot> {
        self.succ.get(u)?.get(v)
    }

    fn edge_handle_at(&self, u: &Key, v: &Key, key: Option<&Key>) -> Option<&SharedAttrs> {
        let id = M::find(self.slot(u, v)?, key)?;
        Some(self.edges.handle(id))
    }

    /// Inserts one edge slot into `adj[from][to]`.
    fn attach(
        adj: &mut KeyedMap<Key, KeyedMap<Key, M::Slot>>,
        from: &Key,
        to: &Key,
        key: Option<Key>,
        id: EdgeId,
    ) {
        let row = adj.get_mut(from).expect("adjacency row exists for every node");
        match row.get_mut(to) {
            Some(slot) => M::insert(slot, key, id),
            None => {
                row.insert(to.clone(), M::single(key, id));
            }
        }
    }

    /// Shared edge-insertion logic of all four variants.
    ///
    /// Returns the resolved edge key (always `Some` for multi variants).
    fn insert_edge_inner(&mut self, u: Key, v: Key, key: Option<Key>, attrs: Attrs) -> Option<Key> {
        self.add_node_if_missing(&u);
        self.add_node_if_missing(&v);

        if let Some(slot) = self.slot(&u, &v) {
            if !M::MULTI {
                if let Some(id) = M::find(slot, None) {
                    self.edges.merge(id, &attrs);
                    return None;
                }
            } else if let Some(k) = &key {
                if let Some(id) = M::find(slot, Some(k)) {
                    self.edges.merge(id, &attrs);
                    return key;
                }
            }
        }

        let key = if M::MULTI {
            key.or_else(|| M::next_key(self.slot(&u, &v)))
        } else {
            None
        };
        let id = self.edges.alloc(attrs);

        Self::attach(&mut self.succ, &u, &v, key.clone(), id);
        if directed::<D>() {
            Self::attach(&mut self.pred, &v, &u, key.clone(), id);
        } else if u != v {
            Self::attach(&mut self.succ, &v, &u, key.clone(), id);
        }
        key
    }

    /// Shared edge-removal logic of all four variants.
    ///
    /// With `key = None` on a multi variant, the most recently inserted
    /// parallel edge is removed.
    fn remove_edge_inner(&mut self, u: &Key, v: &Key, key: Option<&Key>) -> GraphResult<Attrs> {
        let row = self
            .succ
            .get_mut(u)
            .ok_or_else(|| GraphError::edge_not_found(u, v, key))?;
        let slot = row
            .get_mut(v)
            .ok_or_else(|| GraphError::edge_not_found(u, v, key))?;
        let (removed_key, id) =
            M::remove(slot, key).ok_or_else(|| GraphError::edge_not_found(u, v, key))?;
        if !M::MULTI || M::len(slot) == 0 {
            row.remove(v);
        }

        if directed::<D>() || u != v {
            let mirror = if directed::<D>() {
                &mut self.pred
            } else {
                &mut self.succ
            };
            if let Some(mirror_row) = mirror.get_mut(v) {
                if let Some(mirror_slot) = mirror_row.get_mut(u) {
                    M::remove(mirror_slot, removed_key.as_ref());
                    if !M::MULTI || M::len(mirror_slot) == 0 {
                        mirror_row.remove(u);
                    }
                }
            }
        }

        Ok(self.edges.release(id).into_attrs())
    }

    fn add_node_if_missing(&mut self, n: &Key) {
        if !self.nodes.contains(n) {
            self.nodes.insert(n.clone(), SharedAttrs::default());
            self.succ.insert(n.clone(), KeyedMap::new());
            if directed::<D>() {
                self.pred.insert(n.clone(), KeyedMap::new());
            }
        }
    }

    fn slot_weight(&self, slot: &M::Slot, weight: &str) -> f64 {
        (0..)
            .map_while(|i| M::entry_at(slot, i))
            .map(|(_, id)| {
                self.edges
                    .attrs(id)
                    .get(weight)
                    .and_then(|v| v.as_number())
                    .unwrap_or(1.0)
            })
            .sum()
    }
}

// ---------- Shared public surface ----------

impl<D: GraphDir, M: EdgeMult> AdjGraph<D, M> {
    /// Returns an iterator over the neighbors of `n` in insertion order.
    ///
    /// For directed variants these are the successors.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    ///
    /// # Examples
    /// ```
    /// use agraphs::prelude::*;
    ///
    /// let g = Graph::from_edges([("a", "b"), ("a", "c")]);
    /// let nbrs: Vec<_> = g.neighbors(&"a".into()).unwrap().cloned().collect();
    /// assert_eq!(nbrs, vec![Key::from("b"), Key::from("c")]);
    /// ```
    pub fn neighbors(&self, n: &Key) -> GraphResult<MapKeys<'_, Key, M::Slot>> {
        Ok(self
            .succ
            .get(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?
            .keys())
    }

    /// Returns the number of edges between `u` and `v` (0 or 1 for simple
    /// variants, the size of the key map for multi variants).
    pub fn number_of_edges_between(&self, u: &Key, v: &Key) -> usize {
        self.slot(u, v).map_or(0, |slot| M::len(slot))
    }

    /// Returns an iterator over all edges as `(u, v)` pairs.
    ///
    /// Undirected variants yield each edge exactly once; multi variants
    /// yield one pair per parallel edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Key, &Key)> + '_ {
        self.edge_iter().map(|(u, v, _, _)| (u, v))
    }

    /// Returns an iterator over all edges with their attribute records.
    pub fn edges_with_data<'a>(
        &'a self,
    ) -> impl Iterator<Item = (&'a Key, &'a Key, Ref<'a, Attrs>)> + 'a {
        self.edge_iter().map(|(u, v, _, a)| (u, v, a.borrow()))
    }

    /// Returns all edges as an owned list of `(u, v)` pairs.
    pub fn edge_list(&self) -> Vec<(Key, Key)> {
        self.edges().map(|(u, v)| (u.clone(), v.clone())).collect()
    }

    /// Returns the sum of the `weight` attribute over all edges, counting
    /// missing (or non-numeric) attributes as 1.
    pub fn size_weighted(&self, weight: &str) -> f64 {
        self.edge_iter()
            .map(|(_, _, _, a)| {
                a.borrow()
                    .get(weight)
                    .and_then(|v| v.as_number())
                    .unwrap_or(1.0)
            })
            .sum()
    }

    /// Returns the weighted degree of `n`: the sum of the `weight`
    /// attribute over all incident edges, defaulting missing attributes
    /// to 1. In undirected variants a self-loop contributes its weight
    /// twice; in directed variants incoming and outgoing edges both count.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    pub fn weighted_degree_of(&self, n: &Key, weight: &str) -> GraphResult<f64> {
        let row = self
            .succ
            .get(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?;
        let mut total: f64 = row.values().map(|slot| self.slot_weight(slot, weight)).sum();

        if directed::<D>() {
            if let Some(in_row) = self.pred.get(n) {
                total += in_row
                    .values()
                    .map(|slot| self.slot_weight(slot, weight))
                    .sum::<f64>();
            }
        } else if let Some(loop_slot) = row.get(n) {
            total += self.slot_weight(loop_slot, weight);
        }
        Ok(total)
    }

    /// Returns an iterator over `(node, degree)` pairs in node insertion
    /// order.
    pub fn degrees(&self) -> impl Iterator<Item = (&Key, usize)> + '_ {
        self.nodes
            .keys()
            .map(|n| (n, self.degree_of(n).unwrap_or(0)))
    }

    /// Returns an iterator over `(node, weighted degree)` pairs.
    pub fn weighted_degrees<'a>(
        &'a self,
        weight: &'a str,
    ) -> impl Iterator<Item = (&'a Key, f64)> + 'a {
        self.nodes
            .keys()
            .map(move |n| (n, self.weighted_degree_of(n, weight).unwrap_or(0.0)))
    }

    /// Returns an iterator over all nodes that have a self-loop.
    pub fn nodes_with_selfloops(&self) -> impl Iterator<Item = &Key> + '_ {
        self.succ
            .entries()
            .filter(|(n, row)| row.contains(n))
            .map(|(n, _)| n)
    }

    /// Returns an iterator over all self-loop edges as `(node, attrs)`
    /// pairs, one per parallel loop in multi variants.
    pub fn selfloop_edges<'a>(&'a self) -> impl Iterator<Item = (&'a Key, Ref<'a, Attrs>)> + 'a {
        self.succ
            .entries()
            .filter_map(|(n, row)| row.get(n).map(|slot| (n, slot)))
            .flat_map(move |(n, slot)| {
                (0..)
                    .map_while(move |i| M::entry_at(slot, i))
                    .map(move |(_, id)| (n, self.edges.attrs(id)))
            })
    }

    /// Returns the number of self-loop edges.
    pub fn number_of_selfloops(&self) -> usize {
        self.succ
            .entries()
            .filter_map(|(n, row)| row.get(n))
            .map(|slot| M::len(slot))
            .sum()
    }

    /// Returns the subgraph induced by `bunch` as a shallow view.
    ///
    /// Nodes of the bunch that are not in the graph are silently filtered
    /// out. The result is a graph of the same variant containing the
    /// surviving nodes and every edge whose endpoints both survive. All
    /// attribute records (graph-level, node, and edge) are **shared** with
    /// the original: mutating a record through either side is visible
    /// through the other. Call [`Clone::clone`] on the result for an
    /// independent deep copy.
    ///
    /// # Examples
    /// ```
    /// use agraphs::prelude::*;
    ///
    /// let g = Graph::from_edges([(0, 1), (1, 2), (2, 3)]);
    /// let sub = g.subgraph([0, 1, 2, 99]);
    /// assert_eq!(sub.order(), 3);
    /// assert_eq!(sub.size(), 2);
    /// ```
    pub fn subgraph<I>(&self, bunch: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let keep: FxHashSet<Key> = bunch
            .into_iter()
            .map(Into::into)
            .filter(|n| self.nodes.contains(n))
            .collect();

        let mut sub = Self {
            attrs: self.attrs.clone(),
            nodes: KeyedMap::new(),
            succ: KeyedMap::new(),
            pred: KeyedMap::new(),
            edges: EdgeTable::default(),
            _dir: PhantomData,
        };
        for (n, record) in self.nodes.entries() {
            if keep.contains(n) {
                sub.nodes.insert(n.clone(), record.clone());
                sub.succ.insert(n.clone(), KeyedMap::new());
                if directed::<D>() {
                    sub.pred.insert(n.clone(), KeyedMap::new());
                }
            }
        }
        for (u, v, key, handle) in self.edge_iter() {
            if !keep.contains(u) || !keep.contains(v) {
                continue;
            }
            let id = sub.edges.adopt(handle.clone());
            Self::attach(&mut sub.succ, u, v, key.cloned(), id);
            if directed::<D>() {
                Self::attach(&mut sub.pred, v, u, key.cloned(), id);
            } else if u != v {
                Self::attach(&mut sub.succ, v, u, key.cloned(), id);
            }
        }
        sub
    }

    /// Removes every node, every edge, and the graph-level attributes.
    pub fn clear(&mut self) {
        self.attrs.borrow_mut().clear();
        self.nodes.clear();
        self.succ.clear();
        self.pred.clear();
        self.edges.clear();
    }

    /// Returns a directed deep copy of this graph.
    ///
    /// Every undirected edge yields both orientations; directed graphs are
    /// copied as-is.
    pub fn to_directed(&self) -> AdjGraph<Directed, M> {
        convert::copy_into(self)
    }

    /// Returns an undirected deep copy of this graph.
    ///
    /// Directed edges collapse onto unordered pairs; attribute collisions
    /// resolve in the order encountered. On an undirected graph this equals
    /// a plain clone.
    pub fn to_undirected(&self) -> AdjGraph<Undirected, M> {
        convert::copy_into(self)
    }

    /// Creates a detached cursor over the node map.
    ///
    /// The cursor fails with a "map changed during iteration" error once a
    /// node is added or removed after its creation; see
    /// [`MapCursor`](crate::map::MapCursor).
    pub fn node_cursor(&self) -> MapCursor {
        self.nodes.cursor()
    }

    /// Advances a cursor created by [`AdjGraph::node_cursor`].
    ///
    /// # Errors
    /// Fails with [`StaleCursor`] if a node was added or removed since the
    /// cursor's creation.
    pub fn next_node<'a>(
        &'a self,
        cursor: &mut MapCursor,
    ) -> Result<Option<(&'a Key, Ref<'a, Attrs>)>, StaleCursor> {
        Ok(cursor
            .next(&self.nodes)?
            .map(|(n, record)| (n, record.borrow())))
    }

    /// Adds every node of the iterator.
    pub fn add_nodes_from<I>(&mut self, nodes: I)
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        for n in nodes {
            self.add_node(n.into());
        }
    }

    /// Adds every `(node, attrs)` pair of the iterator, merging into
    /// already present nodes.
    pub fn add_nodes_with_attrs<I, K>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = (K, Attrs)>,
        K: Into<Key>,
    {
        for (n, attrs) in nodes {
            self.add_node_with(n.into(), attrs);
        }
    }

    /// Removes every node of the iterator, silently skipping nodes that
    /// are not in the graph.
    pub fn remove_nodes_from<I>(&mut self, nodes: I)
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        for n in nodes {
            let n = n.into();
            if self.nodes.contains(&n) {
                let _ = self.remove_node(&n);
            }
        }
    }

    /// Adds every edge of the iterator; see [`EdgeInit`](crate::convert::EdgeInit)
    /// for the accepted item shapes.
    pub fn add_edges_from<I>(&mut self, edges: I)
    where
        I: IntoIterator,
        I::Item: Into<convert::EdgeInit>,
    {
        convert::populate_from_edges(self, edges);
    }

    /// Adds every edge of the iterator on top of a common base record:
    /// each edge receives a copy of `base` with the edge's own attributes
    /// merged over it.
    pub fn add_edges_with_attrs<I>(&mut self, edges: I, base: &Attrs)
    where
        I: IntoIterator,
        I::Item: Into<convert::EdgeInit>,
    {
        for init in edges {
            let init = init.into();
            let mut attrs = base.clone();
            attrs.merge(&init.attrs);
            self.insert_edge_inner(init.u, init.v, init.key, attrs);
        }
    }

    /// Adds every `(u, v, w)` edge with `w` stored under the `weight`
    /// attribute.
    pub fn add_weighted_edges_from<I, U, V, W>(&mut self, edges: I)
    where
        I: IntoIterator<Item = (U, V, W)>,
        U: Into<Key>,
        V: Into<Key>,
        W: Into<crate::attr::Value>,
    {
        self.add_weighted_edges_named(edges, "weight");
    }

    /// Adds every `(u, v, w)` edge with `w` stored under the given
    /// attribute name.
    pub fn add_weighted_edges_named<I, U, V, W>(&mut self, edges: I, weight: &str)
    where
        I: IntoIterator<Item = (U, V, W)>,
        U: Into<Key>,
        V: Into<Key>,
        W: Into<crate::attr::Value>,
    {
        for (u, v, w) in edges {
            let mut attrs = Attrs::new();
            attrs.set(weight, w);
            self.insert_edge_inner(u.into(), v.into(), None, attrs);
        }
    }

    /// Removes every edge of the iterator, silently skipping edges that
    /// are not in the graph. Items may carry a key to designate a specific
    /// parallel edge in multi variants.
    pub fn remove_edges_from<I>(&mut self, edges: I)
    where
        I: IntoIterator,
        I::Item: Into<convert::EdgeInit>,
    {
        for init in edges {
            let init = init.into();
            let _ = self.remove_edge_inner(&init.u, &init.v, init.key.as_ref());
        }
    }

    fn edge_iter(&self) -> EdgeIter<'_, D, M> {
        EdgeIter {
            graph: self,
            u_idx: 0,
            v_idx: 0,
            k_idx: 0,
            seen: FxHashSet::default(),
        }
    }
}

// ---------- Simple variants ----------

impl<D: GraphDir> AdjGraph<D, Simple> {
    /// Adds the edge `(u, v)`, adding missing endpoints.
    ///
    /// Adding an existing edge is a no-op (there is nothing to merge).
    pub fn add_edge(&mut self, u: impl Into<Key>, v: impl Into<Key>) {
        self.insert_edge_inner(u.into(), v.into(), None, Attrs::new());
    }

    /// Adds the edge `(u, v)` with attributes, merging `attrs` into the
    /// record of an already existing edge.
    ///
    /// # Examples
    /// ```
    /// use agraphs::{attrs, prelude::*};
    ///
    /// let mut g = Graph::new();
    /// g.add_edge_with("a", "b", attrs! { "weight" => 2 });
    /// g.add_edge_with("a", "b", attrs! { "color" => "red" });
    ///
    /// let data = g.get_edge_data(&"a".into(), &"b".into()).unwrap();
    /// assert_eq!(data.len(), 2);
    /// ```
    pub fn add_edge_with(&mut self, u: impl Into<Key>, v: impl Into<Key>, attrs: Attrs) {
        self.insert_edge_inner(u.into(), v.into(), None, attrs);
    }

    /// Removes the edge `(u, v)` and returns its attribute record.
    ///
    /// # Errors
    /// Fails with a lookup error if the edge is not in the graph.
    pub fn remove_edge(&mut self, u: &Key, v: &Key) -> GraphResult<Attrs> {
        self.remove_edge_inner(u, v, None)
    }

    /// Borrows the attribute record of the edge `(u, v)`.
    ///
    /// Does not fail on missing nodes: the result is simply `None`.
    pub fn get_edge_data<'a>(&'a self, u: &Key, v: &Key) -> Option<Ref<'a, Attrs>> {
        self.edge_handle_at(u, v, None).map(SharedAttrs::borrow)
    }

    /// Borrows the attribute record of the edge `(u, v)` for mutation.
    ///
    /// Both mirrored adjacency entries (and any subgraph view containing
    /// the edge) observe the change.
    pub fn edge_attrs_mut<'a>(&'a mut self, u: &Key, v: &Key) -> Option<RefMut<'a, Attrs>> {
        let id = Simple::find(self.slot(u, v)?, None)?;
        Some(self.edges.handle(id).borrow_mut())
    }
}

// ---------- Multi variants ----------

impl<D: GraphDir> AdjGraph<D, Multi> {
    /// Adds a new parallel edge `(u, v)` and returns its automatically
    /// assigned key: the smallest non-negative integer not used between
    /// these endpoints.
    ///
    /// # Examples
    /// ```
    /// use agraphs::prelude::*;
    ///
    /// let mut g = MultiGraph::new();
    /// assert_eq!(g.add_edge("a", "b"), Key::Int(0));
    /// assert_eq!(g.add_edge("a", "b"), Key::Int(1));
    /// assert_eq!(g.number_of_edges_between(&"a".into(), &"b".into()), 2);
    /// ```
    pub fn add_edge(&mut self, u: impl Into<Key>, v: impl Into<Key>) -> Key {
        self.add_edge_with(u, v, Attrs::new())
    }

    /// Adds a new parallel edge `(u, v)` with attributes and returns its
    /// automatically assigned key.
    pub fn add_edge_with(&mut self, u: impl Into<Key>, v: impl Into<Key>, attrs: Attrs) -> Key {
        self.insert_edge_inner(u.into(), v.into(), None, attrs)
            .expect("multi edge insertion resolves a key")
    }

    /// Adds the edge `(u, v)` under an explicit key, merging `attrs` into
    /// the record of an existing edge with the same key.
    pub fn add_edge_with_key(
        &mut self,
        u: impl Into<Key>,
        v: impl Into<Key>,
        key: impl Into<Key>,
        attrs: Attrs,
    ) -> Key {
        self.insert_edge_inner(u.into(), v.into(), Some(key.into()), attrs)
            .expect("multi edge insertion resolves a key")
    }

    /// Removes the most recently inserted edge between `u` and `v` and
    /// returns its attribute record. The neighbor entry disappears from
    /// both mirrored sides once its key map becomes empty.
    ///
    /// # Errors
    /// Fails with a lookup error if no edge connects `u` and `v`.
    pub fn remove_edge(&mut self, u: &Key, v: &Key) -> GraphResult<Attrs> {
        self.remove_edge_inner(u, v, None)
    }

    /// Removes the edge with the given key between `u` and `v`.
    ///
    /// # Errors
    /// Fails with a lookup error if that key is not present.
    pub fn remove_edge_with_key(&mut self, u: &Key, v: &Key, key: &Key) -> GraphResult<Attrs> {
        self.remove_edge_inner(u, v, Some(key))
    }

    /// Returns `true` if an edge with the given key connects `u` and `v`.
    pub fn has_edge_with_key(&self, u: &Key, v: &Key, key: &Key) -> bool {
        self.slot(u, v)
            .and_then(|slot| Multi::find(slot, Some(key)))
            .is_some()
    }

    /// Borrows the attribute record of the edge with the given key.
    ///
    /// Does not fail on missing nodes: the result is simply `None`.
    pub fn get_edge_data<'a>(&'a self, u: &Key, v: &Key, key: &Key) -> Option<Ref<'a, Attrs>> {
        self.edge_handle_at(u, v, Some(key)).map(SharedAttrs::borrow)
    }

    /// Borrows the attribute record of the edge with the given key for
    /// mutation. Both mirrored adjacency entries (and any subgraph view
    /// containing the edge) observe the change.
    pub fn edge_attrs_mut<'a>(&'a mut self, u: &Key, v: &Key, key: &Key) -> Option<RefMut<'a, Attrs>> {
        let id = Multi::find(self.slot(u, v)?, Some(key))?;
        Some(self.edges.handle(id).borrow_mut())
    }

    /// Returns an iterator over `(key, attrs)` for every parallel edge
    /// between `u` and `v`.
    pub fn all_edge_data<'a>(
        &'a self,
        u: &Key,
        v: &Key,
    ) -> impl Iterator<Item = (&'a Key, Ref<'a, Attrs>)> + 'a {
        self.slot(u, v).into_iter().flat_map(move |slot| {
            slot.entries().map(move |(k, id)| (k, self.edges.attrs(*id)))
        })
    }

    /// Returns an iterator over all edges as `(u, v, key)` triples.
    pub fn edges_with_keys(&self) -> impl Iterator<Item = (&Key, &Key, &Key)> + '_ {
        self.edge_iter()
            .filter_map(|(u, v, k, _)| k.map(|k| (u, v, k)))
    }

    /// Returns an iterator over all edges as `(u, v, key, attrs)` tuples.
    pub fn edges_with_keys_data<'a>(
        &'a self,
    ) -> impl Iterator<Item = (&'a Key, &'a Key, &'a Key, Ref<'a, Attrs>)> + 'a {
        self.edge_iter()
            .filter_map(|(u, v, k, a)| k.map(|k| (u, v, k, a.borrow())))
    }
}

// ---------- Directed variants ----------

impl<M: EdgeMult> AdjGraph<Directed, M> {
    /// Returns an iterator over the successors of `n`; an alias of
    /// [`AdjGraph::neighbors`].
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    pub fn successors(&self, n: &Key) -> GraphResult<MapKeys<'_, Key, M::Slot>> {
        self.neighbors(n)
    }

    /// Returns an iterator over the predecessors of `n`.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    pub fn predecessors(&self, n: &Key) -> GraphResult<MapKeys<'_, Key, M::Slot>> {
        Ok(self
            .pred
            .get(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?
            .keys())
    }

    /// Returns the number of outgoing edges of `n`.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    pub fn out_degree_of(&self, n: &Key) -> GraphResult<usize> {
        Ok(self
            .succ
            .get(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?
            .values()
            .map(|slot| M::len(slot))
            .sum())
    }

    /// Returns the number of incoming edges of `n`.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    pub fn in_degree_of(&self, n: &Key) -> GraphResult<usize> {
        Ok(self
            .pred
            .get(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?
            .values()
            .map(|slot| M::len(slot))
            .sum())
    }

    /// Returns an iterator over `(node, out-degree)` pairs.
    pub fn out_degrees(&self) -> impl Iterator<Item = (&Key, usize)> + '_ {
        self.nodes
            .keys()
            .map(|n| (n, self.out_degree_of(n).unwrap_or(0)))
    }

    /// Returns an iterator over `(node, in-degree)` pairs.
    pub fn in_degrees(&self) -> impl Iterator<Item = (&Key, usize)> + '_ {
        self.nodes
            .keys()
            .map(|n| (n, self.in_degree_of(n).unwrap_or(0)))
    }

    /// Returns an iterator over the outgoing edges of `n` as
    /// `(n, target, attrs)`, one item per parallel edge.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    pub fn out_edges<'a>(
        &'a self,
        n: &Key,
    ) -> GraphResult<impl Iterator<Item = (&'a Key, &'a Key, Ref<'a, Attrs>)> + 'a> {
        let (_, source, row) = self
            .succ
            .get_full(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?;
        Ok(row.entries().flat_map(move |(v, slot)| {
            (0..)
                .map_while(move |i| M::entry_at(slot, i))
                .map(move |(_, id)| (source, v, self.edges.attrs(id)))
        }))
    }

    /// Returns an iterator over the incoming edges of `n` as
    /// `(source, n, attrs)`, one item per parallel edge.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    pub fn in_edges<'a>(
        &'a self,
        n: &Key,
    ) -> GraphResult<impl Iterator<Item = (&'a Key, &'a Key, Ref<'a, Attrs>)> + 'a> {
        let (_, target, row) = self
            .pred
            .get_full(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?;
        Ok(row.entries().flat_map(move |(p, slot)| {
            (0..)
                .map_while(move |i| M::entry_at(slot, i))
                .map(move |(_, id)| (p, target, self.edges.attrs(id)))
        }))
    }

    /// Returns a deep copy with all edges reversed.
    ///
    /// # Examples
    /// ```
    /// use agraphs::prelude::*;
    ///
    /// let g = DiGraph::from_edges([(0, 1)]);
    /// let r = g.reverse();
    /// assert!(r.has_edge(&1.into(), &0.into()));
    /// assert!(!r.has_edge(&0.into(), &1.into()));
    /// ```
    pub fn reverse(&self) -> Self {
        let mut reversed = self.clone();
        reversed.reverse_in_place();
        reversed
    }

    /// Reverses all edges in place by swapping the successor and
    /// predecessor maps.
    pub fn reverse_in_place(&mut self) {
        std::mem::swap(&mut self.succ, &mut self.pred);
    }

    /// Returns an undirected copy keeping only the pairs that have edges
    /// in both directions. For multi variants an edge survives only if the
    /// same key is present in both directions.
    pub fn to_undirected_reciprocal(&self) -> AdjGraph<Undirected, M> {
        let mut undirected =
            AdjGraph::<Undirected, M>::with_graph_attrs(self.attrs.borrow().clone());
        for (n, record) in self.nodes.entries() {
            undirected.add_node_with(n.clone(), record.borrow().clone());
        }
        for record in self.edge_records() {
            if self
                .edge_handle_at(&record.v, &record.u, record.key.as_ref())
                .is_some()
            {
                undirected.insert_record(record);
            }
        }
        undirected
    }
}

// ---------- Trait implementations ----------

impl<D: GraphDir, M: EdgeMult> GraphType for AdjGraph<D, M> {
    type Dir = D;

    fn is_multigraph() -> bool {
        M::MULTI
    }
}

impl<D: GraphDir, M: EdgeMult> GraphOrder for AdjGraph<D, M> {
    fn order(&self) -> usize {
        self.nodes.len()
    }

    fn size(&self) -> usize {
        self.edges.len()
    }
}

impl<D: GraphDir, M: EdgeMult> GraphAttrs for AdjGraph<D, M> {
    fn attrs(&self) -> Ref<'_, Attrs> {
        self.attrs.borrow()
    }

    fn attrs_mut(&mut self) -> RefMut<'_, Attrs> {
        self.attrs.borrow_mut()
    }
}

impl<D: GraphDir, M: EdgeMult> NodeOps for AdjGraph<D, M> {
    type NodeIter<'a>
        = MapKeys<'a, Key, SharedAttrs>
    where
        Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        self.nodes.keys()
    }

    fn has_node(&self, n: &Key) -> bool {
        self.nodes.contains(n)
    }

    fn node_attrs(&self, n: &Key) -> Option<Ref<'_, Attrs>> {
        self.nodes.get(n).map(SharedAttrs::borrow)
    }

    fn node_attrs_mut(&mut self, n: &Key) -> Option<RefMut<'_, Attrs>> {
        self.nodes.get(n).map(SharedAttrs::borrow_mut)
    }

    fn add_node_with(&mut self, n: Key, attrs: Attrs) {
        if let Some(existing) = self.nodes.get(&n) {
            existing.borrow_mut().merge(&attrs);
            return;
        }
        self.succ.insert(n.clone(), KeyedMap::new());
        if directed::<D>() {
            self.pred.insert(n.clone(), KeyedMap::new());
        }
        self.nodes.insert(n, SharedAttrs::new(attrs));
    }

    fn remove_node(&mut self, n: &Key) -> GraphResult<Attrs> {
        let attrs = self
            .nodes
            .remove(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?
            .into_attrs();

        if let Some(row) = self.succ.remove(n) {
            for (v, slot) in row {
                for (_, id) in M::entries(&slot) {
                    self.edges.release(id);
                }
                if &v == n {
                    continue;
                }
                let mirror = if directed::<D>() {
                    &mut self.pred
                } else {
                    &mut self.succ
                };
                if let Some(mirror_row) = mirror.get_mut(&v) {
                    mirror_row.remove(n);
                }
            }
        }

        if directed::<D>() {
            if let Some(row) = self.pred.remove(n) {
                for (p, slot) in row {
                    // records of the self-loop were already released above
                    if &p == n {
                        continue;
                    }
                    for (_, id) in M::entries(&slot) {
                        self.edges.release(id);
                    }
                    if let Some(out_row) = self.succ.get_mut(&p) {
                        out_row.remove(n);
                    }
                }
            }
        }

        Ok(attrs)
    }
}

impl<D: GraphDir, M: EdgeMult> EdgeOps for AdjGraph<D, M> {
    fn edge_records(&self) -> Vec<EdgeRecord> {
        self.edge_iter()
            .map(|(u, v, key, record)| EdgeRecord {
                u: u.clone(),
                v: v.clone(),
                key: key.cloned(),
                attrs: record.borrow().clone(),
            })
            .collect()
    }

    fn incident_records(&self, n: &Key) -> Vec<EdgeRecord> {
        let mut records = Vec::new();
        if let Some(row) = self.succ.get(n) {
            for (v, slot) in row.entries() {
                for (key, id) in M::entries(slot) {
                    records.push(EdgeRecord {
                        u: n.clone(),
                        v: v.clone(),
                        key,
                        attrs: self.edges.attrs(id).clone(),
                    });
                }
            }
        }
        if directed::<D>() {
            if let Some(row) = self.pred.get(n) {
                for (p, slot) in row.entries() {
                    // the self-loop is already recorded as an out-edge
                    if p == n {
                        continue;
                    }
                    for (key, id) in M::entries(slot) {
                        records.push(EdgeRecord {
                            u: p.clone(),
                            v: n.clone(),
                            key,
                            attrs: self.edges.attrs(id).clone(),
                        });
                    }
                }
            }
        }
        records
    }

    fn insert_record(&mut self, record: EdgeRecord) {
        self.insert_edge_inner(record.u, record.v, record.key, record.attrs);
    }

    fn has_edge(&self, u: &Key, v: &Key) -> bool {
        self.slot(u, v).is_some()
    }

    fn degree_of(&self, n: &Key) -> GraphResult<usize> {
        let row = self
            .succ
            .get(n)
            .ok_or_else(|| GraphError::NodeNotFound(n.clone()))?;
        let out: usize = row.values().map(|slot| M::len(slot)).sum();

        let extra = if directed::<D>() {
            self.pred
                .get(n)
                .map_or(0, |in_row| in_row.values().map(|slot| M::len(slot)).sum())
        } else {
            // a self-loop counts twice
            row.get(n).map_or(0, |slot| M::len(slot))
        };
        Ok(out + extra)
    }
}

impl<D: GraphDir, M: EdgeMult> GraphNew for AdjGraph<D, M> {
    fn new() -> Self {
        AdjGraph::new()
    }

    fn with_graph_attrs(attrs: Attrs) -> Self {
        AdjGraph::with_graph_attrs(attrs)
    }
}

/// Graphs compare by node set, edge set (including edge keys), and the
/// contents of the attached attribute records. The graph-level record is
/// not compared, so renamed but otherwise identical graphs are equal.
impl<D: GraphDir, M: EdgeMult> PartialEq for AdjGraph<D, M> {
    fn eq(&self, other: &Self) -> bool {
        if self.order() != other.order() || self.size() != other.size() {
            return false;
        }
        if !self.nodes.entries().all(|(n, record)| {
            other
                .node_attrs(n)
                .is_some_and(|attrs| *attrs == *record.borrow())
        }) {
            return false;
        }
        self.edge_iter().all(|(u, v, key, record)| {
            other
                .edge_handle_at(u, v, key)
                .is_some_and(|handle| handle == record)
        })
    }
}

// ---------- Edge iteration ----------

/// Iterator over all edges of a graph.
///
/// Yields `(u, v, key, record handle)` with `key` present for multi
/// variants. Undirected graphs yield each edge exactly once: neighbors
/// already exhausted as outer nodes are marked seen and skipped.
pub struct EdgeIter<'a, D, M>
where
    D: GraphDir,
    M: EdgeMult,
{
    graph: &'a AdjGraph<D, M>,
    u_idx: usize,
    v_idx: usize,
    k_idx: usize,
    seen: FxHashSet<Key>,
}

impl<'a, D: GraphDir, M: EdgeMult> Iterator for EdgeIter<'a, D, M> {
    type Item = (&'a Key, &'a Key, Option<&'a Key>, &'a SharedAttrs);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (u, row) = self.graph.succ.get_index(self.u_idx)?;

            if let Some((v, slot)) = row.get_index(self.v_idx) {
                if directed::<D>() || !self.seen.contains(v) {
                    if let Some((key, id)) = M::entry_at(slot, self.k_idx) {
                        self.k_idx += 1;
                        return Some((u, v, key, self.graph.edges.handle(id)));
                    }
                }
                self.v_idx += 1;
                self.k_idx = 0;
                continue;
            }

            if !directed::<D>() {
                self.seen.insert(u.clone());
            }
            self.u_idx += 1;
            self.v_idx = 0;
            self.k_idx = 0;
        }
    }
}

// ---------- Testing ----------

test_graph_variants!(test_graph, Graph, undirected);
test_graph_variants!(test_digraph, DiGraph, directed);
test_graph_variants!(test_multigraph, MultiGraph, undirected);
test_graph_variants!(test_multidigraph, MultiDiGraph, directed);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attr::Value, attrs};
    use itertools::Itertools;

    #[test]
    fn basic_adjacency() {
        let mut g = Graph::new();
        g.add_edges_from([("A", "B"), ("A", "C"), ("B", "C"), ("C", "D")]);

        assert_eq!(g.node_list(), ["A", "B", "C", "D"].map(Key::from).to_vec());
        assert!(g.has_edge(&"A".into(), &"B".into()));
        assert!(!g.has_edge(&"A".into(), &"D".into()));
        assert_eq!(g.degree_of(&"A".into()), Ok(2));
        assert_eq!(g.size(), 4);
    }

    #[test]
    fn adding_an_existing_edge_merges_attrs() {
        let mut g = Graph::new();
        g.add_edge_with(0, 1, attrs! { "weight" => 1 });
        g.add_edge_with(0, 1, attrs! { "weight" => 3, "color" => "red" });

        assert_eq!(g.size(), 1);
        assert_eq!(
            *g.get_edge_data(&0.into(), &1.into()).unwrap(),
            attrs! { "weight" => 3, "color" => "red" }
        );
    }

    #[test]
    fn mirrored_entries_share_one_record() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        g.edge_attrs_mut(&"a".into(), &"b".into())
            .unwrap()
            .set("weight", 5);

        // the change is visible through the mirrored entry
        assert_eq!(
            g.get_edge_data(&"b".into(), &"a".into()).unwrap().get("weight"),
            Some(&Value::Int(5))
        );
    }

    #[test]
    fn directed_mirror_shares_one_record() {
        let mut g = DiGraph::new();
        g.add_edge("a", "b");
        g.edge_attrs_mut(&"a".into(), &"b".into())
            .unwrap()
            .set("weight", 7);

        let incoming = g.in_edges(&"b".into()).unwrap().collect_vec();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].2.get("weight"), Some(&Value::Int(7)));
    }

    #[test]
    fn selfloops_count_twice_in_undirected_degree() {
        let mut g = Graph::new();
        g.add_edge("a", "a");
        g.add_edge("a", "b");

        assert_eq!(g.degree_of(&"a".into()), Ok(3));
        assert_eq!(g.number_of_selfloops(), 1);
        assert_eq!(g.nodes_with_selfloops().collect_vec(), vec![&Key::from("a")]);
    }

    #[test]
    fn selfloops_count_once_per_direction() {
        let mut g = DiGraph::new();
        g.add_edge("a", "a");

        assert_eq!(g.in_degree_of(&"a".into()), Ok(1));
        assert_eq!(g.out_degree_of(&"a".into()), Ok(1));
        assert_eq!(g.degree_of(&"a".into()), Ok(2));
    }

    #[test]
    fn weighted_degree_defaults_missing_weights_to_one() {
        let mut g = Graph::new();
        g.add_weighted_edges_from([("a", "b", 2.0)]);
        g.add_edge("a", "c");
        g.add_edge_with("a", "a", attrs! { "weight" => 10 });

        // 2 + 1 + self-loop weight counted twice
        assert_eq!(g.weighted_degree_of(&"a".into(), "weight"), Ok(23.0));
        assert_eq!(g.size_weighted("weight"), 13.0);
    }

    #[test]
    fn edges_are_enumerated_once_with_selfloops() {
        let g = Graph::from_edges([(0, 1), (1, 2), (2, 0), (1, 1)]);
        assert_eq!(g.edges().count(), 4);
        assert_eq!(g.size(), 4);
    }

    #[test]
    fn removing_a_node_cascades_to_incident_edges() {
        let mut g = Graph::from_edges([("a", "b"), ("a", "c"), ("b", "c")]);
        let removed = g.remove_node(&"a".into());
        assert!(removed.is_ok());

        assert_eq!(g.order(), 2);
        assert_eq!(g.size(), 1);
        assert_eq!(
            g.neighbors(&"b".into()).unwrap().collect_vec(),
            vec![&Key::from("c")]
        );
    }

    #[test]
    fn removing_a_node_cascades_across_directions_and_keys() {
        let mut g = MultiDiGraph::new();
        g.add_edge("a", "b");
        g.add_edge("a", "b");
        g.add_edge("b", "a");
        g.add_edge("a", "a");
        g.add_edge("b", "c");

        g.remove_node(&"a".into()).unwrap();
        assert_eq!(g.order(), 2);
        assert_eq!(g.size(), 1);
        assert!(g.has_edge(&"b".into(), &"c".into()));
    }

    #[test]
    fn unknown_lookups_fail() {
        let mut g = Graph::from_edges([(0, 1)]);

        assert_eq!(
            g.remove_node(&7.into()),
            Err(GraphError::NodeNotFound(Key::Int(7)))
        );
        assert_eq!(
            g.remove_edge(&0.into(), &7.into()),
            Err(GraphError::EdgeNotFound {
                u: Key::Int(0),
                v: Key::Int(7),
                key: None,
            })
        );
        assert!(g.neighbors(&7.into()).is_err());
        assert!(g.get_edge_data(&0.into(), &7.into()).is_none());
    }

    #[test]
    fn silent_bulk_removal_skips_unknowns() {
        let mut g = Graph::from_edges([(0, 1), (1, 2)]);
        g.remove_nodes_from([5, 0, 6]);
        g.remove_edges_from([(1, 2), (8, 9)]);

        assert_eq!(g.order(), 2);
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn add_then_remove_edge_restores_the_graph() {
        let g = Graph::from_edges([(0, 1), (1, 2)]);
        let mut edited = g.clone();

        edited.add_edge(0, 2);
        edited.remove_edge(&0.into(), &2.into()).unwrap();
        assert_eq!(edited, g);
    }

    #[test]
    fn clones_are_independent() {
        let g = Graph::from_edges([(0, 1)]);
        let mut copy = g.clone();
        copy.add_edge(1, 2);
        copy.edge_attrs_mut(&0.into(), &1.into())
            .unwrap()
            .set("weight", 9);

        assert_eq!(g.size(), 1);
        assert!(g.get_edge_data(&0.into(), &1.into()).unwrap().is_empty());
    }

    #[test]
    fn multi_edges_get_smallest_free_keys() {
        let mut g = MultiGraph::new();
        assert_eq!(g.add_edge("a", "b"), Key::Int(0));
        assert_eq!(g.add_edge("a", "b"), Key::Int(1));

        g.remove_edge_with_key(&"a".into(), &"b".into(), &Key::Int(0))
            .unwrap();
        assert_eq!(g.add_edge("a", "b"), Key::Int(0));
        assert_eq!(g.number_of_edges_between(&"a".into(), &"b".into()), 2);
    }

    #[test]
    fn multi_pair_entry_disappears_with_its_last_key() {
        let mut g = MultiGraph::new();
        let first = g.add_edge("a", "b");
        let second = g.add_edge("a", "b");

        g.remove_edge_with_key(&"a".into(), &"b".into(), &first).unwrap();
        assert!(g.has_edge(&"a".into(), &"b".into()));

        g.remove_edge_with_key(&"a".into(), &"b".into(), &second).unwrap();
        assert!(!g.has_edge(&"a".into(), &"b".into()));
        assert!(!g.has_edge(&"b".into(), &"a".into()));
        assert_eq!(g.number_of_edges_between(&"a".into(), &"b".into()), 0);
    }

    #[test]
    fn multi_remove_without_key_takes_the_newest_edge() {
        let mut g = MultiDiGraph::new();
        g.add_edge_with("a", "b", attrs! { "tag" => "old" });
        g.add_edge_with("a", "b", attrs! { "tag" => "new" });

        let removed = g.remove_edge(&"a".into(), &"b".into()).unwrap();
        assert_eq!(removed, attrs! { "tag" => "new" });
        assert_eq!(g.size(), 1);
    }

    #[test]
    fn multi_edge_iteration_reports_keys() {
        let mut g = MultiGraph::new();
        g.add_edge("a", "b");
        g.add_edge_with_key("a", "b", "x", attrs! { "weight" => 2 });

        let keyed = g.edges_with_keys().collect_vec();
        assert_eq!(keyed.len(), 2);
        assert!(keyed
            .iter()
            .any(|(_, _, k)| *k == &Key::from("x")));

        let data = g
            .all_edge_data(&"b".into(), &"a".into())
            .map(|(k, a)| (k.clone(), a.clone()))
            .collect_vec();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn directed_to_undirected_roundtrips_edge_set() {
        let g = Graph::from_edges([(0, 1), (1, 2), (2, 2)]);
        let roundtripped = g.to_directed().to_undirected();
        assert_eq!(roundtripped, g);
    }

    #[test]
    fn to_directed_symmetrizes_undirected_edges() {
        let g = Graph::from_edges([(0, 1), (1, 2), (2, 2)]);
        let d = g.to_directed();

        assert_eq!(d.size(), 5);
        assert!(d.has_edge(&1.into(), &0.into()));
        assert!(d.has_edge(&2.into(), &2.into()));
    }

    #[test]
    fn reverse_swaps_degrees_and_roundtrips() {
        let g = DiGraph::from_edges([(0, 1), (0, 2), (0, 0)]);
        let r = g.reverse();

        assert_eq!(r.in_degree_of(&0.into()), Ok(g.out_degree_of(&0.into()).unwrap()));
        assert_eq!(r.out_degree_of(&0.into()), Ok(g.in_degree_of(&0.into()).unwrap()));
        assert_eq!(r.reverse(), g);
    }

    #[test]
    fn reverse_in_place_flips_edges() {
        let mut g = DiGraph::from_edges([(0, 1)]);
        g.reverse_in_place();
        assert!(g.has_edge(&1.into(), &0.into()));
        assert!(!g.has_edge(&0.into(), &1.into()));
    }

    #[test]
    fn reciprocal_keeps_two_way_pairs_only() {
        let mut g = DiGraph::new();
        g.add_edge(0, 1);
        g.add_edge(1, 0);
        g.add_edge(1, 2);

        let u = g.to_undirected_reciprocal();
        assert_eq!(u.order(), 3);
        assert_eq!(u.size(), 1);
        assert!(u.has_edge(&0.into(), &1.into()));
    }

    #[test]
    fn reciprocal_on_multi_requires_matching_keys() {
        let mut g = MultiDiGraph::new();
        g.add_edge_with_key(0, 1, "k", Attrs::new());
        g.add_edge_with_key(1, 0, "k", Attrs::new());
        g.add_edge_with_key(0, 1, "j", Attrs::new());

        let u = g.to_undirected_reciprocal();
        assert_eq!(u.number_of_edges_between(&0.into(), &1.into()), 1);
        assert!(u.has_edge_with_key(&0.into(), &1.into(), &"k".into()));
    }

    #[test]
    fn subgraph_restricts_nodes_and_edges() {
        let mut g = Graph::new();
        g.attrs_mut().set("kind", "test");
        g.add_node_with("a".into(), attrs! { "color" => "red" });
        g.add_edges_from([("a", "b"), ("b", "c"), ("c", "d")]);

        let sub = g.subgraph(["a", "b", "c", "zzz"]);
        assert_eq!(sub.order(), 3);
        assert_eq!(sub.size(), 2);
        assert_eq!(
            *sub.node_attrs(&"a".into()).unwrap(),
            attrs! { "color" => "red" }
        );
        assert_eq!(sub.attrs().get("kind"), Some(&Value::Text("test".into())));
        assert!(!sub.has_edge(&"c".into(), &"d".into()));
    }

    #[test]
    fn subgraph_shares_attribute_records() {
        let mut g = Graph::new();
        g.add_node_with("a".into(), attrs! { "color" => "red" });
        g.add_edge_with("a", "b", attrs! { "weight" => 1 });
        g.add_edge("b", "c");

        let mut sub = g.subgraph(["a", "b"]);

        // a mutation through the parent is visible through the view
        g.edge_attrs_mut(&"a".into(), &"b".into())
            .unwrap()
            .set("weight", 9);
        assert_eq!(
            sub.get_edge_data(&"a".into(), &"b".into()).unwrap().get("weight"),
            Some(&Value::Int(9))
        );

        // and the other way around
        sub.node_attrs_mut(&"a".into()).unwrap().set("color", "blue");
        assert_eq!(
            g.node_attrs(&"a".into()).unwrap().get("color"),
            Some(&Value::Text("blue".into()))
        );
    }

    #[test]
    fn subgraph_clone_detaches_records() {
        let mut g = Graph::new();
        g.add_edge_with("a", "b", attrs! { "weight" => 1 });

        let copy = g.subgraph(["a", "b"]).clone();
        g.edge_attrs_mut(&"a".into(), &"b".into())
            .unwrap()
            .set("weight", 5);

        assert_eq!(
            copy.get_edge_data(&"a".into(), &"b".into()).unwrap().get("weight"),
            Some(&Value::Int(1))
        );
    }

    #[test]
    fn clear_destroys_everything() {
        let mut g = MultiGraph::from_edges([(0, 1), (0, 1)]);
        g.set_name("doomed");
        g.clear();

        assert!(g.is_empty());
        assert_eq!(g.size(), 0);
        assert!(g.attrs().is_empty());
    }

    #[test]
    fn node_cursor_fails_after_structural_change() {
        let mut g = Graph::from_edges([(0, 1)]);
        let mut cursor = g.node_cursor();
        assert!(g.next_node(&mut cursor).unwrap().is_some());

        g.add_node(9.into());
        assert!(g.next_node(&mut cursor).is_err());
    }

    #[test]
    fn graph_name_lives_in_the_attr_record() {
        let mut g = Graph::new();
        g.set_name("lattice");
        assert_eq!(g.name(), "lattice");
        assert_eq!(g.attrs().get("name"), Some(&Value::Text("lattice".into())));
    }

    #[test]
    fn predecessor_and_successor_views() {
        let mut g = DiGraph::new();
        g.add_edge("a", "b");
        g.add_edge("c", "b");

        assert_eq!(
            g.predecessors(&"b".into()).unwrap().collect_vec(),
            vec![&Key::from("a"), &Key::from("c")]
        );
        assert_eq!(g.successors(&"b".into()).unwrap().count(), 0);

        let out = g.out_edges(&"a".into()).unwrap().collect_vec();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1, &Key::from("b"));
    }
}
