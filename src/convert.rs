/*!
# Graph Conversion

Utilities for building graphs from non-graph data and for copying one graph
variant into another.

Everything here consumes only the public mutation API
([`NodeOps::add_node_with`], [`EdgeOps::insert_record`]), so it works
uniformly for all four variants.
*/

use crate::{
    attr::Attrs,
    key::Key,
    ops::{EdgeOps, EdgeRecord, GraphAttrs, GraphNew, GraphType, NodeOps},
};

/// One edge of an edge-list initializer.
///
/// Accepted item shapes:
/// - `(u, v)` — plain edge;
/// - `(u, v, attrs)` — edge with an attribute record;
/// - `(u, v, key, attrs)` — keyed edge for multi variants (simple variants
///   ignore the key).
#[derive(Clone, Debug)]
pub struct EdgeInit {
    pub u: Key,
    pub v: Key,
    pub key: Option<Key>,
    pub attrs: Attrs,
}

impl<U: Into<Key>, V: Into<Key>> From<(U, V)> for EdgeInit {
    fn from((u, v): (U, V)) -> Self {
        EdgeInit {
            u: u.into(),
            v: v.into(),
            key: None,
            attrs: Attrs::new(),
        }
    }
}

impl<U: Into<Key>, V: Into<Key>> From<(U, V, Attrs)> for EdgeInit {
    fn from((u, v, attrs): (U, V, Attrs)) -> Self {
        EdgeInit {
            u: u.into(),
            v: v.into(),
            key: None,
            attrs,
        }
    }
}

impl<U: Into<Key>, V: Into<Key>, K: Into<Key>> From<(U, V, K, Attrs)> for EdgeInit {
    fn from((u, v, key, attrs): (U, V, K, Attrs)) -> Self {
        EdgeInit {
            u: u.into(),
            v: v.into(),
            key: Some(key.into()),
            attrs,
        }
    }
}

impl From<EdgeRecord> for EdgeInit {
    fn from(record: EdgeRecord) -> Self {
        EdgeInit {
            u: record.u,
            v: record.v,
            key: record.key,
            attrs: record.attrs,
        }
    }
}

/// Adds every edge of `edges` to `graph` through the public mutation API.
pub fn populate_from_edges<G, I>(graph: &mut G, edges: I)
where
    G: EdgeOps,
    I: IntoIterator,
    I::Item: Into<EdgeInit>,
{
    for init in edges {
        let init = init.into();
        graph.insert_record(EdgeRecord {
            u: init.u,
            v: init.v,
            key: init.key,
            attrs: init.attrs,
        });
    }
}

/// Copies `input` into a fresh graph of variant `GO`.
///
/// - Graph-level and node attribute records are deep copies.
/// - Copying an undirected graph into a directed variant emits both
///   orientations of every edge.
/// - Copying parallel edges into a simple variant collapses them, merging
///   attributes in encounter order.
/// - Edge keys are forwarded; simple targets ignore them, multi targets
///   auto-assign keys for edges arriving without one.
pub fn copy_into<GI, GO>(input: &GI) -> GO
where
    GI: EdgeOps,
    GO: EdgeOps + GraphNew,
{
    let mut output = GO::with_graph_attrs(input.attrs().clone());

    for n in input.nodes() {
        let attrs = input.node_attrs(n).map(|a| a.clone()).unwrap_or_default();
        output.add_node_with(n.clone(), attrs);
    }

    let symmetrize = GI::is_undirected() && GO::is_directed();
    for record in input.edge_records() {
        if symmetrize && record.u != record.v {
            output.insert_record(record.clone().reversed());
        }
        output.insert_record(record);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attrs, prelude::*};

    #[test]
    fn edge_init_shapes() {
        let mut g = Graph::new();
        g.add_edges_from([(0, 1)]);
        g.add_edges_from([(1, 2, attrs! { "weight" => 2 })]);

        assert_eq!(g.size(), 2);
        assert_eq!(
            *g.get_edge_data(&1.into(), &2.into()).unwrap(),
            attrs! { "weight" => 2 }
        );
    }

    #[test]
    fn keyed_edge_init() {
        let mut g = MultiGraph::new();
        g.add_edges_from([("a", "b", "fast", attrs! { "weight" => 1 })]);
        g.add_edges_from([("a", "b", "slow", attrs! { "weight" => 9 })]);

        assert_eq!(g.number_of_edges_between(&"a".into(), &"b".into()), 2);
        assert!(g.has_edge_with_key(&"a".into(), &"b".into(), &"fast".into()));
    }

    #[test]
    fn undirected_to_directed_symmetrizes() {
        let g = Graph::from_edges([(0, 1), (1, 1)]);
        let d: DiGraph = copy_into(&g);

        assert_eq!(d.size(), 3);
        assert!(d.has_edge(&0.into(), &1.into()));
        assert!(d.has_edge(&1.into(), &0.into()));
        assert!(d.has_edge(&1.into(), &1.into()));
    }

    #[test]
    fn directed_to_undirected_collapses() {
        let mut d = DiGraph::new();
        d.add_edge_with(0, 1, attrs! { "dir" => "fwd" });
        d.add_edge_with(1, 0, attrs! { "dir" => "back" });

        let g: Graph = copy_into(&d);
        assert_eq!(g.size(), 1);
        // collisions resolve in encounter order: the later record wins
        assert_eq!(
            g.get_edge_data(&0.into(), &1.into()).unwrap().get("dir"),
            Some(&Value::Text("back".into()))
        );
    }

    #[test]
    fn multi_to_simple_collapses_parallels() {
        let mut m = MultiGraph::new();
        m.add_edge_with("a", "b", attrs! { "weight" => 1 });
        m.add_edge_with("a", "b", attrs! { "weight" => 2 });

        let g: Graph = copy_into(&m);
        assert_eq!(g.size(), 1);
        assert_eq!(
            g.get_edge_data(&"a".into(), &"b".into()).unwrap().get("weight"),
            Some(&Value::Int(2))
        );
    }

    #[test]
    fn copy_preserves_isolated_nodes_and_attrs() {
        let mut g = Graph::new();
        g.set_name("orig");
        g.add_node_with("alone".into(), attrs! { "color" => "blue" });

        let copy: MultiGraph = copy_into(&g);
        assert_eq!(copy.order(), 1);
        assert_eq!(copy.name(), "orig");
        assert_eq!(
            *copy.node_attrs(&"alone".into()).unwrap(),
            attrs! { "color" => "blue" }
        );
    }
}
