/*!
# Graph Representation

This module contains the concrete graph data structures one can use.
All four variants share one storage layout and differ only along two axes:
direction and edge multiplicity.

### Variants

- [`Graph`]
  Simple undirected graph. Every edge `{u, v}` appears as the two mirrored
  adjacency entries `adj[u][v]` and `adj[v][u]` sharing one attribute
  record.

- [`DiGraph`]
  Simple directed graph. Keeps a successor and a predecessor map; every
  edge `(u, v)` appears once in each, sharing one attribute record.

- [`MultiGraph`]
  Undirected graph allowing parallel edges. The per-neighbor payload is a
  keyed sub-map from edge key to attribute record.

- [`MultiDiGraph`]
  Directed graph allowing parallel edges: the two extensions composed.

## Choosing a Variant

- Use **`Graph`** / **`DiGraph`** when at most one edge can connect a node
  pair; adding an existing edge merges attributes.
- Use **`MultiGraph`** / **`MultiDiGraph`** when parallel edges matter;
  edges between the same endpoints are distinguished by edge key, and keys
  are auto-assigned as the smallest free non-negative integer unless
  supplied.
*/

pub mod graph;
pub mod storage;

pub use graph::{AdjGraph, DiGraph, EdgeIter, Graph, MultiDiGraph, MultiGraph};
pub use storage::{EdgeId, EdgeMult, Multi, Simple};
