/*!
`agraphs` is a graph data structure library designed for graphs that are
- **a**ttributed : the graph, every node, and every edge carry a mutable string-keyed attribute record
- **a**rbitrarily keyed : nodes are identified by integers, text, or structured pairs instead of dense indices

# Representation

Node identifiers are [`Key`](key::Key) values; attribute records are
[`Attrs`](attr::Attrs) maps held through [`SharedAttrs`](attr::SharedAttrs)
handles. Adjacency is stored in insertion-ordered
[`KeyedMap`](map::KeyedMap)s whose mirrored entries share one attribute
record through an edge side table, so `adj[u][v]` and `adj[v][u]` (resp.
`succ[u][v]` and `pred[v][u]`) always observe the same data. Subgraph
views alias their parent's records the same way; cloning detaches.

### Available Variants

See the [`repr`] module for the full list of graph variants:

- [`Graph`](repr::Graph) — simple undirected
- [`DiGraph`](repr::DiGraph) — simple directed
- [`MultiGraph`](repr::MultiGraph) — undirected with parallel edges
- [`MultiDiGraph`](repr::MultiDiGraph) — directed with parallel edges

All four share one storage layout and one trait surface ([`ops`]), so the
[`relabel`] machinery, the [`convert`] helpers, and the [`gens`]
substructure generators work uniformly across them.

# Design

Operations come in capability traits ([`ops`]) implemented by every
variant, plus variant-specific inherent methods where the APIs genuinely
differ (edge keys on multi variants, predecessor access and reversal on
directed variants). Construction accepts edge lists
([`GraphFromEdges`](ops::GraphFromEdges)), other graphs of any variant
([`AdjGraph::from_graph`](repr::AdjGraph::from_graph)), or nothing.

# Usage

```
use agraphs::{attrs, prelude::*};
use agraphs::relabel::relabel_nodes;

let mut g = Graph::new();
g.add_edges_from([("a", "b"), ("b", "c")]);
g.add_edge_with("c", "a", attrs! { "weight" => 2 });

let mut mapping = KeyedMap::new();
mapping.insert(Key::from("a"), Key::from("x"));
let relabeled = relabel_nodes(&g, &mapping);

assert!(relabeled.has_edge(&"x".into(), &"b".into()));
assert_eq!(relabeled.size(), 3);
```

# When to use

You should only use this library if the following apply:
- Your nodes carry identities and attributes worth keeping
- You mutate graphs incrementally and care about insertion order
- You need parallel edges, node relabeling, or both

If your graphs are unlabelled and performance-critical, a dense
integer-indexed representation will serve you better.
*/

pub mod attr;
pub mod convert;
pub mod error;
pub mod gens;
pub mod key;
pub mod map;
pub mod ops;
pub mod relabel;
pub mod repr;
pub(crate) mod testing;

/// `agraphs::prelude` includes the key and attribute types, all graph
/// operation traits, and the four graph variants.
pub mod prelude {
    pub use super::{
        attr::{Attrs, SharedAttrs, Value},
        error::{GraphError, GraphResult},
        gens::Substructures,
        key::Key,
        map::{KeyedMap, MapCursor, StaleCursor},
        ops::*,
        repr::*,
    };
}
