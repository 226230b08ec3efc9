/*!
# Node Relabeling

Renames the nodes of a graph according to a partial mapping, either by
building a relabeled copy or by rewriting the graph in place.

- [`relabel_nodes`] builds a copy; keys absent from the mapping pass
  through unchanged.
- [`relabel_nodes_with`] pre-materializes a rename function over the
  current nodes and then builds a copy.
- [`relabel_nodes_in_place`] rewrites nodes one at a time. When old and new
  label sets overlap, the mapping's induced digraph is sorted
  topologically (self-loops dropped) and nodes are processed in reverse
  topological order so no node is renamed to a label still in use. A cycle
  in the mapping makes in-place relabeling infeasible.
- [`convert_node_labels_to_integers`] maps node labels onto consecutive
  integers under one of four [`NodeOrdering`]s.

# Examples
```
use agraphs::{prelude::*, relabel::relabel_nodes};

let g = Graph::from_edges([("a", "b")]);
let mut mapping = KeyedMap::new();
mapping.insert(Key::from("a"), Key::from("x"));

let relabeled = relabel_nodes(&g, &mapping);
assert!(relabeled.has_edge(&"x".into(), &"b".into()));
```
*/

use std::str::FromStr;

use fxhash::{FxHashMap, FxHashSet};

use crate::{
    attr::Value,
    error::{GraphError, GraphResult},
    key::Key,
    map::KeyedMap,
    ops::{EdgeOps, GraphAttrs, GraphNew, GraphOrder, NodeOps},
    repr::DiGraph,
};

/// Graph attribute under which [`convert_node_labels_to_integers`] stores
/// the original labels when asked to keep them.
pub const NODE_LABELS: &str = "node_labels";

fn renamed(mapping: &KeyedMap<Key, Key>, key: &Key) -> Key {
    mapping.get(key).cloned().unwrap_or_else(|| key.clone())
}

/// Returns a relabeled copy of `graph`.
///
/// Endpoints are rewritten through `mapping` (absent keys pass through
/// unchanged) and every attribute record is deep-copied. The copy's name
/// is the original name wrapped in parentheses.
pub fn relabel_nodes<G>(graph: &G, mapping: &KeyedMap<Key, Key>) -> G
where
    G: EdgeOps + GraphNew,
{
    let mut relabeled = G::with_graph_attrs(graph.attrs().clone());
    relabeled.set_name(format!("({})", graph.name()));

    for mut record in graph.edge_records() {
        record.u = renamed(mapping, &record.u);
        record.v = renamed(mapping, &record.v);
        relabeled.insert_record(record);
    }
    for n in graph.nodes() {
        let attrs = graph.node_attrs(n).map(|a| a.clone()).unwrap_or_default();
        relabeled.add_node_with(renamed(mapping, n), attrs);
    }
    relabeled
}

/// Returns a relabeled copy of `graph`, renaming every node through the
/// given function.
///
/// The function is materialized into a mapping over the current nodes
/// before any rewriting happens.
pub fn relabel_nodes_with<G, F>(graph: &G, mut rename: F) -> G
where
    G: EdgeOps + GraphNew,
    F: FnMut(&Key) -> Key,
{
    let mapping: KeyedMap<Key, Key> = graph.nodes().map(|n| (n.clone(), rename(n))).collect();
    relabel_nodes(graph, &mapping)
}

/// Relabels the nodes of `graph` in place.
///
/// When the old and new label sets are disjoint, nodes are rewritten in
/// mapping order. Otherwise the mapping's induced digraph (self-loops
/// dropped) is sorted topologically and nodes are rewritten in reverse
/// topological order.
///
/// # Errors
/// - An infeasibility error if the mapping's induced digraph has a
///   non-self-loop cycle; relabel into a copy instead.
/// - A lookup error if a mapped old label is not a node of the graph.
pub fn relabel_nodes_in_place<G>(graph: &mut G, mapping: &KeyedMap<Key, Key>) -> GraphResult<()>
where
    G: EdgeOps,
{
    let old_labels: FxHashSet<&Key> = mapping.keys().collect();
    let disjoint = !mapping.values().any(|new| old_labels.contains(new));

    let order: Vec<Key> = if disjoint {
        mapping.keys().cloned().collect()
    } else {
        let mut induced = DiGraph::new();
        for (old, new) in mapping.entries() {
            if old == new {
                induced.add_node(old.clone());
            } else {
                induced.add_edge(old.clone(), new.clone());
            }
        }

        let sorted: Vec<Key> = TopoSort::new(&induced).collect();
        if sorted.len() != induced.order() {
            return Err(GraphError::MappingCycle);
        }
        sorted
            .into_iter()
            .rev()
            .filter(|n| mapping.contains(n))
            .collect()
    };

    for old in &order {
        rewrite_node(graph, old, renamed(mapping, old))?;
    }
    Ok(())
}

/// Rewrites one node: re-adds its attribute record under the new label and
/// re-inserts every incident edge with the endpoint substituted.
///
/// Directed variants re-insert both in- and out-edges; multi variants keep
/// each edge's key.
fn rewrite_node<G: EdgeOps>(graph: &mut G, old: &Key, new: Key) -> GraphResult<()> {
    if !graph.has_node(old) {
        return Err(GraphError::NodeNotFound(old.clone()));
    }

    let incident = graph.incident_records(old);
    let attrs = graph.remove_node(old)?;
    graph.add_node_with(new.clone(), attrs);

    for mut record in incident {
        if record.u == *old {
            record.u = new.clone();
        }
        if record.v == *old {
            record.v = new.clone();
        }
        graph.insert_record(record);
    }
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////////////// TopoSort

/// Kahn-style topological iterator over the mapping's induced digraph.
///
/// The iterator stops prematurely iff the graph is not acyclic; callers
/// compare the yielded count against the node count to detect cycles.
struct TopoSort<'a> {
    graph: &'a DiGraph,
    in_degs: FxHashMap<Key, usize>,
    stack: Vec<Key>,
}

impl<'a> TopoSort<'a> {
    fn new(graph: &'a DiGraph) -> Self {
        let mut in_degs: FxHashMap<Key, usize> =
            graph.nodes().map(|n| (n.clone(), 0)).collect();
        for u in graph.nodes() {
            if let Ok(successors) = graph.successors(u) {
                for v in successors {
                    if let Some(deg) = in_degs.get_mut(v) {
                        *deg += 1;
                    }
                }
            }
        }

        let stack: Vec<Key> = graph
            .nodes()
            .filter(|n| in_degs.get(*n) == Some(&0))
            .cloned()
            .collect();

        Self {
            graph,
            in_degs,
            stack,
        }
    }
}

impl<'a> Iterator for TopoSort<'a> {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        let u = self.stack.pop()?;

        if let Ok(successors) = self.graph.successors(&u) {
            for v in successors {
                if let Some(deg) = self.in_degs.get_mut(v) {
                    *deg -= 1;
                    if *deg == 0 {
                        self.stack.push(v.clone());
                    }
                }
            }
        }

        Some(u)
    }
}

///////////////////////////////////////////////////////////////////// Integer labels

/// Node orderings accepted by [`convert_node_labels_to_integers`].
///
/// Ties in the degree orderings keep their original relative order.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeOrdering {
    /// Node insertion order.
    #[default]
    Default,
    /// Ascending key order.
    Sorted,
    /// Ascending degree.
    IncreasingDegree,
    /// Descending degree.
    DecreasingDegree,
}

impl FromStr for NodeOrdering {
    type Err = GraphError;

    fn from_str(s: &str) -> GraphResult<Self> {
        match s.to_lowercase().as_str() {
            "default" => Ok(NodeOrdering::Default),
            "sorted" => Ok(NodeOrdering::Sorted),
            "increasing degree" => Ok(NodeOrdering::IncreasingDegree),
            "decreasing degree" => Ok(NodeOrdering::DecreasingDegree),
            _ => Err(GraphError::Malformed(format!("unknown node ordering: {s}"))),
        }
    }
}

/// Returns a copy of `graph` whose nodes are the integers `first,
/// first + 1, …` assigned in the given ordering.
///
/// The copy's name is the original name suffixed `_with_int_labels`. When
/// `discard_old` is false, the original labels are attached to the result
/// under the [`NODE_LABELS`] graph attribute as `[new, old]` pairs.
///
/// # Examples
/// ```
/// use agraphs::{prelude::*, relabel::*};
///
/// let g = Graph::from_edges([("a", "b"), ("b", "c")]);
/// let h = convert_node_labels_to_integers(&g, 0, NodeOrdering::Default, true);
/// assert_eq!(h.node_list(), vec![Key::Int(0), Key::Int(1), Key::Int(2)]);
/// ```
pub fn convert_node_labels_to_integers<G>(
    graph: &G,
    first: i64,
    ordering: NodeOrdering,
    discard_old: bool,
) -> G
where
    G: EdgeOps + GraphNew,
{
    let mut order: Vec<Key> = graph.node_list();
    match ordering {
        NodeOrdering::Default => {}
        NodeOrdering::Sorted => order.sort(),
        NodeOrdering::IncreasingDegree => {
            order.sort_by_key(|n| graph.degree_of(n).unwrap_or(0));
        }
        NodeOrdering::DecreasingDegree => {
            order.sort_by_key(|n| std::cmp::Reverse(graph.degree_of(n).unwrap_or(0)));
        }
    }

    let mapping: KeyedMap<Key, Key> = order
        .iter()
        .enumerate()
        .map(|(i, n)| (n.clone(), Key::Int(first + i as i64)))
        .collect();

    let mut relabeled = relabel_nodes(graph, &mapping);
    relabeled.set_name(format!("{}_with_int_labels", graph.name()));
    if !discard_old {
        let pairs: Vec<Value> = mapping
            .entries()
            .map(|(old, new)| Value::List(vec![new.into(), old.into()]))
            .collect();
        relabeled.attrs_mut().set(NODE_LABELS, Value::List(pairs));
    }
    relabeled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attrs, prelude::*};
    use itertools::Itertools;

    /// The "paw": a triangle A-B-C with a pendant D hanging off C.
    fn paw() -> Graph {
        Graph::from_edges([("A", "B"), ("A", "C"), ("B", "C"), ("C", "D")])
    }

    fn animal_mapping() -> KeyedMap<Key, Key> {
        [("A", "aardvark"), ("B", "bear"), ("C", "cat"), ("D", "dog")]
            .into_iter()
            .map(|(old, new)| (Key::from(old), Key::from(new)))
            .collect()
    }

    #[test]
    fn copy_relabel_renames_nodes_and_edges() {
        let g = paw();
        let relabeled = relabel_nodes(&g, &animal_mapping());

        let nodes = relabeled.node_list().into_iter().sorted().collect_vec();
        assert_eq!(
            nodes,
            ["aardvark", "bear", "cat", "dog"].map(Key::from).to_vec()
        );
        assert!(relabeled.has_edge(&"aardvark".into(), &"bear".into()));
        assert!(relabeled.has_edge(&"cat".into(), &"dog".into()));
        assert!(!relabeled.has_edge(&"aardvark".into(), &"dog".into()));
        assert_eq!(relabeled.size(), 4);
    }

    #[test]
    fn copy_relabel_wraps_name() {
        let mut g = paw();
        g.set_name("paw");
        let relabeled = relabel_nodes(&g, &animal_mapping());
        assert_eq!(relabeled.name(), "(paw)");
    }

    #[test]
    fn partial_mapping_passes_unmapped_labels_through() {
        let g = paw();
        let mut mapping = KeyedMap::new();
        mapping.insert(Key::from("A"), Key::from("aardvark"));

        let relabeled = relabel_nodes(&g, &mapping);
        assert!(relabeled.has_node(&"aardvark".into()));
        assert!(relabeled.has_node(&"B".into()));
        assert!(relabeled.has_edge(&"aardvark".into(), &"B".into()));
    }

    #[test]
    fn relabel_by_function_materializes_mapping() {
        let g = paw();
        let relabeled = relabel_nodes_with(&g, |n| {
            Key::Int(n.as_str().unwrap().chars().next().unwrap() as i64)
        });

        let nodes = relabeled.node_list().into_iter().sorted().collect_vec();
        assert_eq!(nodes, vec![Key::Int(65), Key::Int(66), Key::Int(67), Key::Int(68)]);
        assert!(relabeled.has_edge(&Key::Int(65), &Key::Int(66)));
    }

    #[test]
    fn relabel_preserves_attrs() {
        let mut g = Graph::new();
        g.add_node_with("A".into(), attrs! { "color" => "red" });
        g.add_edge_with("A", "B", attrs! { "weight" => 2 });
        g.attrs_mut().set("kind", "test");

        let relabeled = relabel_nodes(&g, &animal_mapping());
        assert_eq!(
            *relabeled.node_attrs(&"aardvark".into()).unwrap(),
            attrs! { "color" => "red" }
        );
        assert_eq!(
            *relabeled
                .get_edge_data(&"aardvark".into(), &"bear".into())
                .unwrap(),
            attrs! { "weight" => 2 }
        );
        assert_eq!(relabeled.attrs().get("kind"), Some(&Value::Text("test".into())));
    }

    #[test]
    fn in_place_relabel_of_multigraph_keeps_parallel_edges() {
        let mut g = MultiGraph::from_edges([("a", "b"), ("a", "b")]);
        let mut mapping = KeyedMap::new();
        mapping.insert(Key::from("a"), Key::from("aardvark"));
        mapping.insert(Key::from("b"), Key::from("bear"));

        relabel_nodes_in_place(&mut g, &mapping).unwrap();

        let nodes = g.node_list().into_iter().sorted().collect_vec();
        assert_eq!(nodes, vec![Key::from("aardvark"), Key::from("bear")]);
        assert_eq!(
            g.number_of_edges_between(&"aardvark".into(), &"bear".into()),
            2
        );
        // the parallel edges keep their keys
        assert!(g.has_edge_with_key(&"aardvark".into(), &"bear".into(), &Key::Int(0)));
        assert!(g.has_edge_with_key(&"aardvark".into(), &"bear".into(), &Key::Int(1)));
    }

    #[test]
    fn in_place_relabel_of_missing_node_fails() {
        let mut g = paw();
        let mut mapping = KeyedMap::new();
        mapping.insert(Key::Int(0), Key::from("aardvark"));

        assert_eq!(
            relabel_nodes_in_place(&mut g, &mapping),
            Err(GraphError::NodeNotFound(Key::Int(0)))
        );
    }

    #[test]
    fn overlapping_mapping_uses_topological_order() {
        let mut g = Graph::from_edges([("a", "b")]);
        let mut mapping = KeyedMap::new();
        mapping.insert(Key::from("a"), Key::from("b"));
        mapping.insert(Key::from("b"), Key::from("c"));

        relabel_nodes_in_place(&mut g, &mapping).unwrap();

        let nodes = g.node_list().into_iter().sorted().collect_vec();
        assert_eq!(nodes, vec![Key::from("b"), Key::from("c")]);
        assert!(g.has_edge(&"b".into(), &"c".into()));
    }

    #[test]
    fn cyclic_mapping_is_infeasible_in_place() {
        let mut g = Graph::from_edges([("a", "b")]);
        let mut mapping = KeyedMap::new();
        mapping.insert(Key::from("a"), Key::from("b"));
        mapping.insert(Key::from("b"), Key::from("a"));

        assert_eq!(
            relabel_nodes_in_place(&mut g, &mapping),
            Err(GraphError::MappingCycle)
        );

        // copy mode handles the swap
        let swapped = relabel_nodes(&g, &mapping);
        assert!(swapped.has_edge(&"a".into(), &"b".into()));
        assert_eq!(swapped.order(), 2);
    }

    #[test]
    fn identity_entries_in_mapping_are_harmless() {
        let mut g = Graph::from_edges([("a", "b")]);
        let mut mapping = KeyedMap::new();
        mapping.insert(Key::from("a"), Key::from("a"));
        mapping.insert(Key::from("b"), Key::from("c"));

        relabel_nodes_in_place(&mut g, &mapping).unwrap();
        assert!(g.has_edge(&"a".into(), &"c".into()));
    }

    #[test]
    fn in_place_relabel_preserves_directions() {
        let mut g = DiGraph::new();
        g.add_edge("x", "y");
        g.add_edge("z", "x");
        g.add_edge("x", "x");

        let mut mapping = KeyedMap::new();
        mapping.insert(Key::from("x"), Key::from("q"));
        relabel_nodes_in_place(&mut g, &mapping).unwrap();

        assert!(g.has_edge(&"q".into(), &"y".into()));
        assert!(!g.has_edge(&"y".into(), &"q".into()));
        assert!(g.has_edge(&"z".into(), &"q".into()));
        assert!(g.has_edge(&"q".into(), &"q".into()));
        assert_eq!(g.size(), 3);
    }

    #[test]
    fn in_place_relabel_of_multidigraph_keeps_keys_and_directions() {
        let mut g = MultiDiGraph::new();
        g.add_edge_with_key("x", "y", "fast", attrs! { "weight" => 1 });
        g.add_edge_with_key("x", "y", "slow", attrs! { "weight" => 9 });
        g.add_edge("y", "x");

        let mut mapping = KeyedMap::new();
        mapping.insert(Key::from("x"), Key::from("q"));
        relabel_nodes_in_place(&mut g, &mapping).unwrap();

        assert!(g.has_edge_with_key(&"q".into(), &"y".into(), &"fast".into()));
        assert!(g.has_edge_with_key(&"q".into(), &"y".into(), &"slow".into()));
        assert!(g.has_edge(&"y".into(), &"q".into()));
        assert_eq!(g.size(), 3);
        assert_eq!(
            *g.get_edge_data(&"q".into(), &"y".into(), &"slow".into())
                .unwrap(),
            attrs! { "weight" => 9 }
        );
    }

    #[test]
    fn identity_relabel_produces_equal_graph() {
        let g = paw();
        let relabeled = relabel_nodes(&g, &KeyedMap::new());
        assert_eq!(relabeled, g);
    }

    #[test]
    fn bijective_relabel_roundtrips() {
        let g = paw();
        let forward = animal_mapping();
        let backward: KeyedMap<Key, Key> = forward
            .entries()
            .map(|(old, new)| (new.clone(), old.clone()))
            .collect();

        let roundtripped = relabel_nodes(&relabel_nodes(&g, &forward), &backward);
        assert_eq!(roundtripped, g);
    }

    #[test]
    fn integer_labels_default_ordering() {
        let g = paw();
        let h = convert_node_labels_to_integers(&g, 4, NodeOrdering::Default, true);
        let nodes = h.node_list().into_iter().sorted().collect_vec();
        assert_eq!(nodes, (4..8).map(Key::Int).collect_vec());
        assert_eq!(h.size(), g.size());
    }

    #[test]
    fn integer_labels_by_increasing_degree() {
        let h = convert_node_labels_to_integers(&paw(), 0, NodeOrdering::IncreasingDegree, true);
        let degrees: Vec<usize> = (0..4)
            .map(|i| h.degree_of(&Key::Int(i)).unwrap())
            .collect();
        assert_eq!(degrees, vec![1, 2, 2, 3]);
    }

    #[test]
    fn integer_labels_by_decreasing_degree() {
        let h = convert_node_labels_to_integers(&paw(), 0, NodeOrdering::DecreasingDegree, true);
        let degrees: Vec<usize> = (0..4)
            .map(|i| h.degree_of(&Key::Int(i)).unwrap())
            .collect();
        assert_eq!(degrees, vec![3, 2, 2, 1]);
    }

    #[test]
    fn integer_labels_sorted_ordering() {
        let g = Graph::from_edges([("c", "a"), ("a", "b")]);
        let h = convert_node_labels_to_integers(&g, 0, NodeOrdering::Sorted, true);

        // "a" < "b" < "c", so the edge (c, a) becomes (2, 0)
        assert!(h.has_edge(&Key::Int(2), &Key::Int(0)));
        assert!(h.has_edge(&Key::Int(0), &Key::Int(1)));
    }

    #[test]
    fn integer_labels_name_and_old_labels() {
        let mut g = paw();
        g.set_name("paw");

        let h = convert_node_labels_to_integers(&g, 0, NodeOrdering::Default, false);
        assert_eq!(h.name(), "paw_with_int_labels");

        let graph_attrs = h.attrs();
        let Some(Value::List(pairs)) = graph_attrs.get(NODE_LABELS) else {
            panic!("expected stored node labels");
        };
        assert_eq!(pairs.len(), 4);
        assert_eq!(
            pairs[0],
            Value::List(vec![Value::Int(0), Value::Text("A".into())])
        );
    }

    #[test]
    fn ordering_names_parse() {
        assert_eq!("sorted".parse::<NodeOrdering>(), Ok(NodeOrdering::Sorted));
        assert_eq!(
            "Increasing Degree".parse::<NodeOrdering>(),
            Ok(NodeOrdering::IncreasingDegree)
        );
        assert!(matches!(
            "degree".parse::<NodeOrdering>(),
            Err(GraphError::Malformed(_))
        ));
    }
}
