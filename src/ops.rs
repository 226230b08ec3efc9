/*!
# Graph Operations

Core graph traits and operations.

This module defines the **fundamental traits** that all graph variants in
`agraphs` implement. It covers:
- **Graph type metadata** ([`GraphType`], [`GraphDir`], [`GraphDirection`]).
- **Node and edge counts** ([`GraphOrder`]).
- **Graph-level attributes** ([`GraphAttrs`]).
- **Node access and lifecycle** ([`NodeOps`]).
- **Record-level edge access** ([`EdgeOps`]).
- **Construction** ([`GraphNew`], [`GraphFromEdges`]).

These traits form the backbone for the relabeling, conversion, and
substructure machinery to work across all four graph variants (simple or
multi, directed or undirected).

# Examples
```
use agraphs::prelude::*;

// Build a simple undirected triangle graph
let g = Graph::from_edges([(0, 1), (1, 2), (2, 0)]);

assert_eq!(g.order(), 3);
assert_eq!(g.size(), 3);
assert!(g.has_edge(&0.into(), &1.into()));
```
*/

use std::cell::{Ref, RefMut};

use crate::{
    attr::{Attrs, Value},
    error::GraphResult,
    key::Key,
};

/// Whether a graph is `Directed` or `Undirected`.
///
/// Used by [`GraphType`] to specialize behavior.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GraphDirection {
    Directed,
    Undirected,
}

/// Marker type representing a directed graph.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Directed;

/// Marker type representing an undirected graph.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Undirected;

/// Trait implemented by [`Directed`] and [`Undirected`].
///
/// Provides a compile-time constant [`GraphDirection`].
pub trait GraphDir: Copy + Default + std::fmt::Debug + 'static {
    const DIRECTION: GraphDirection;
}

impl GraphDir for Directed {
    const DIRECTION: GraphDirection = GraphDirection::Directed;
}

impl GraphDir for Undirected {
    const DIRECTION: GraphDirection = GraphDirection::Undirected;
}

/// Identifies the variant of a graph: directed or undirected, simple or
/// multi.
///
/// Every graph variant **must implement this trait**. Generic code uses it
/// to specialize behavior, e.g. emitting both orientations when copying an
/// undirected graph into a directed one.
///
/// # Examples
/// ```
/// use agraphs::prelude::*;
///
/// assert!(DiGraph::is_directed());
/// assert!(!DiGraph::is_multigraph());
/// assert!(MultiGraph::is_multigraph());
/// ```
pub trait GraphType {
    /// Getter for graph direction. This allows for selective
    /// implementations of operations that are only meant for
    /// directed/undirected graphs.
    type Dir: GraphDir;

    /// Returns *true* if parallel edges are supported.
    fn is_multigraph() -> bool;

    /// Returns *true* if the graph is directed
    #[inline(always)]
    fn is_directed() -> bool {
        Self::Dir::DIRECTION == GraphDirection::Directed
    }

    /// Returns *true* if the graph is undirected
    #[inline(always)]
    fn is_undirected() -> bool {
        Self::Dir::DIRECTION == GraphDirection::Undirected
    }
}

/// Provides accessors related to the number of nodes and edges.
///
/// # Examples
/// ```
/// use agraphs::prelude::*;
///
/// let g = Graph::from_edges([("a", "b"), ("b", "c")]);
/// assert_eq!(g.order(), 3);
/// assert_eq!(g.size(), 2);
/// assert!(!g.is_empty());
/// ```
pub trait GraphOrder {
    /// Returns the number of nodes in the graph.
    fn order(&self) -> usize;

    /// Returns the number of edges in the graph.
    ///
    /// For multi variants, every parallel edge counts.
    fn size(&self) -> usize;

    /// Returns the number of nodes as an alias of [`GraphOrder::order`].
    fn number_of_nodes(&self) -> usize {
        self.order()
    }

    /// Returns the number of edges as an alias of [`GraphOrder::size`].
    fn number_of_edges(&self) -> usize {
        self.size()
    }

    /// Returns `true` if the graph has no nodes (and therefore no edges).
    fn is_empty(&self) -> bool {
        self.order() == 0
    }
}

/// Provides access to the graph-level attribute record.
///
/// The optional graph name lives in this record under the `name` attribute.
///
/// # Examples
/// ```
/// use agraphs::prelude::*;
///
/// let mut g = Graph::new();
/// assert_eq!(g.name(), "");
///
/// g.set_name("paw");
/// assert_eq!(g.name(), "paw");
/// ```
pub trait GraphAttrs {
    /// Borrows the graph-level attribute record.
    ///
    /// The record may be aliased by subgraph views of this graph.
    fn attrs(&self) -> Ref<'_, Attrs>;

    /// Borrows the graph-level attribute record for mutation.
    fn attrs_mut(&mut self) -> RefMut<'_, Attrs>;

    /// Returns the graph name, or `""` if none is set.
    fn name(&self) -> String {
        match self.attrs().get("name") {
            Some(Value::Text(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// Stores `name` in the graph-level attribute record.
    fn set_name(&mut self, name: impl Into<String>) {
        self.attrs_mut().set("name", name.into());
    }
}

/// Provides access to nodes and their attribute records.
///
/// Nodes iterate in insertion order. Adding a node that is already present
/// merges the supplied attributes into the existing record.
///
/// # Examples
/// ```
/// use agraphs::{attrs, prelude::*};
///
/// let mut g = Graph::new();
/// g.add_node_with("a".into(), attrs! { "color" => "red" });
/// g.add_node("b".into());
///
/// assert_eq!(g.node_list(), vec![Key::from("a"), Key::from("b")]);
/// assert!(g.node_attrs(&"b".into()).unwrap().is_empty());
/// ```
pub trait NodeOps: GraphOrder {
    /// Iterator over all nodes in the graph.
    ///
    /// Returned by [`NodeOps::nodes`].
    type NodeIter<'a>: Iterator<Item = &'a Key> + 'a
    where
        Self: 'a;

    /// Returns an iterator over all nodes in insertion order.
    fn nodes(&self) -> Self::NodeIter<'_>;

    /// Returns all nodes as an owned list.
    fn node_list(&self) -> Vec<Key> {
        self.nodes().cloned().collect()
    }

    /// Returns `true` if `n` is a node of the graph.
    fn has_node(&self, n: &Key) -> bool;

    /// Borrows the attribute record of node `n`.
    ///
    /// The record may be aliased by subgraph views of this graph.
    fn node_attrs(&self, n: &Key) -> Option<Ref<'_, Attrs>>;

    /// Borrows the attribute record of node `n` for mutation.
    fn node_attrs_mut(&mut self, n: &Key) -> Option<RefMut<'_, Attrs>>;

    /// Adds node `n` with an empty attribute record.
    ///
    /// Adding an existing node is a no-op.
    fn add_node(&mut self, n: Key) {
        self.add_node_with(n, Attrs::new());
    }

    /// Adds node `n`, merging `attrs` into the record of an already present
    /// node.
    fn add_node_with(&mut self, n: Key, attrs: Attrs);

    /// Removes node `n` and every edge incident to it, returning the node's
    /// attribute record.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    fn remove_node(&mut self, n: &Key) -> GraphResult<Attrs>;
}

/// A single edge described by its endpoints, its key (multi variants only),
/// and a copy of its attribute record.
///
/// [`EdgeOps`] exchanges edges in this uniform shape so that relabeling and
/// conversion work identically across all four variants.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub u: Key,
    pub v: Key,
    pub key: Option<Key>,
    pub attrs: Attrs,
}

impl EdgeRecord {
    /// Creates a record without key or attributes.
    pub fn new(u: impl Into<Key>, v: impl Into<Key>) -> Self {
        Self {
            u: u.into(),
            v: v.into(),
            key: None,
            attrs: Attrs::new(),
        }
    }

    /// Creates a record with attributes.
    pub fn with_attrs(u: impl Into<Key>, v: impl Into<Key>, attrs: Attrs) -> Self {
        Self {
            u: u.into(),
            v: v.into(),
            key: None,
            attrs,
        }
    }

    /// Returns the same record with endpoints swapped.
    pub fn reversed(self) -> Self {
        Self {
            u: self.v,
            v: self.u,
            key: self.key,
            attrs: self.attrs,
        }
    }
}

/// Record-level access to edges, uniform across all variants.
///
/// Undirected edge enumeration yields each edge exactly once; directed
/// enumeration yields each directed edge once. Multi variants carry the
/// edge key in every record.
pub trait EdgeOps: NodeOps + GraphType + GraphAttrs {
    /// Returns every edge of the graph as an owned record.
    fn edge_records(&self) -> Vec<EdgeRecord>;

    /// Returns every edge incident to `n`: for directed variants both
    /// out-edges (with `n` as source) and in-edges (with `n` as target).
    /// A self-loop is reported once.
    fn incident_records(&self, n: &Key) -> Vec<EdgeRecord>;

    /// Inserts `record` into the graph, adding missing endpoints.
    ///
    /// Simple variants merge the record's attributes into an existing edge;
    /// multi variants merge only when the record's key matches an existing
    /// key and create a parallel edge otherwise.
    fn insert_record(&mut self, record: EdgeRecord);

    /// Returns `true` if at least one edge connects `u` to `v`.
    fn has_edge(&self, u: &Key, v: &Key) -> bool;

    /// Returns the degree of node `n`.
    ///
    /// A self-loop contributes 2 in undirected variants; in directed
    /// variants the degree is the sum of in- and out-degree, so a self-loop
    /// contributes 2 there as well.
    ///
    /// # Errors
    /// Fails with a lookup error if `n` is not in the graph.
    fn degree_of(&self, n: &Key) -> GraphResult<usize>;
}

/// Trait for creating empty graphs.
pub trait GraphNew: Sized {
    /// Creates an empty graph.
    fn new() -> Self;

    /// Creates an empty graph with the given graph-level attribute record.
    fn with_graph_attrs(attrs: Attrs) -> Self;
}

/// Trait for constructing graphs directly from an edge list.
///
/// # Examples
/// ```
/// use agraphs::prelude::*;
///
/// let g = DiGraph::from_edges([(0, 1), (1, 2)]);
/// assert_eq!(g.order(), 3);
/// assert_eq!(g.size(), 2);
/// ```
pub trait GraphFromEdges: GraphNew + EdgeOps {
    /// Creates a graph containing the given edges and their endpoints.
    fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<crate::convert::EdgeInit>,
    {
        let mut graph = Self::new();
        crate::convert::populate_from_edges(&mut graph, edges);
        graph
    }
}

impl<G: GraphNew + EdgeOps> GraphFromEdges for G {}
