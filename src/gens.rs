/*!
# Substructure Generators

This module provides utility methods to add common **substructures** to an
already existing graph:

- **Paths**
- **Cycles**
- **Stars**

These methods are useful when seeding a graph with known motifs, e.g. for
tests or small hand-built networks.

# Example

```
use agraphs::prelude::*;

let mut g = Graph::new();
g.add_path([0, 1, 2]);
g.add_cycle([2, 3, 4]);
g.add_star([0, 5, 6]);

assert!(g.has_edge(&1.into(), &2.into()));
assert!(g.has_edge(&4.into(), &2.into()));
assert!(g.has_edge(&0.into(), &6.into()));
```
*/

use itertools::Itertools;

use crate::{attr::Attrs, key::Key, ops::{EdgeOps, EdgeRecord}};

/// Trait for adding **substructures** (paths, cycles, stars) to an already
/// existing graph.
///
/// Implemented for all graph variants. The `*_with` flavors attach a copy
/// of a common attribute record to every created edge.
pub trait Substructures: EdgeOps {
    /// Connects the given nodes in order with a **path**, adding missing
    /// nodes.
    ///
    /// A single node is added without edges; an empty iterator is a no-op.
    ///
    /// # Example
    /// ```
    /// use agraphs::prelude::*;
    ///
    /// let mut g = Graph::new();
    /// g.add_path([0, 1, 2, 3]);
    ///
    /// assert_eq!(g.size(), 3);
    /// assert!(g.has_edge(&2.into(), &3.into()));
    /// ```
    fn add_path<P>(&mut self, nodes: P)
    where
        P: IntoIterator,
        P::Item: Into<Key>,
    {
        self.add_path_with(nodes, &Attrs::new());
    }

    /// Like [`Substructures::add_path`], attaching `attrs` to every edge.
    fn add_path_with<P>(&mut self, nodes: P, attrs: &Attrs)
    where
        P: IntoIterator,
        P::Item: Into<Key>,
    {
        let nodes: Vec<Key> = nodes.into_iter().map(Into::into).collect();
        for n in &nodes {
            self.add_node(n.clone());
        }
        for (u, v) in nodes.into_iter().tuple_windows() {
            self.insert_record(EdgeRecord::with_attrs(u, v, attrs.clone()));
        }
    }

    /// Connects the given nodes with a **cycle**: a path whose last node is
    /// connected back to the first.
    ///
    /// A single node receives a self-loop.
    ///
    /// # Example
    /// ```
    /// use agraphs::prelude::*;
    ///
    /// let mut g = DiGraph::new();
    /// g.add_cycle([0, 1, 2]);
    ///
    /// assert!(g.has_edge(&2.into(), &0.into()));
    /// assert!(!g.has_edge(&0.into(), &2.into()));
    /// ```
    fn add_cycle<C>(&mut self, nodes: C)
    where
        C: IntoIterator,
        C::Item: Into<Key>,
    {
        self.add_cycle_with(nodes, &Attrs::new());
    }

    /// Like [`Substructures::add_cycle`], attaching `attrs` to every edge.
    fn add_cycle_with<C>(&mut self, nodes: C, attrs: &Attrs)
    where
        C: IntoIterator,
        C::Item: Into<Key>,
    {
        let nodes: Vec<Key> = nodes.into_iter().map(Into::into).collect();
        self.add_path_with(nodes.clone(), attrs);

        if let (Some(last), Some(first)) = (nodes.last(), nodes.first()) {
            self.insert_record(EdgeRecord::with_attrs(
                last.clone(),
                first.clone(),
                attrs.clone(),
            ));
        }
    }

    /// Connects the first node to every other node, forming a **star**.
    ///
    /// A single node is added without edges.
    ///
    /// # Example
    /// ```
    /// use agraphs::prelude::*;
    ///
    /// let mut g = Graph::new();
    /// g.add_star(["hub", "a", "b", "c"]);
    ///
    /// assert_eq!(g.degree_of(&"hub".into()), Ok(3));
    /// assert!(!g.has_edge(&"a".into(), &"b".into()));
    /// ```
    fn add_star<S>(&mut self, nodes: S)
    where
        S: IntoIterator,
        S::Item: Into<Key>,
    {
        self.add_star_with(nodes, &Attrs::new());
    }

    /// Like [`Substructures::add_star`], attaching `attrs` to every edge.
    fn add_star_with<S>(&mut self, nodes: S, attrs: &Attrs)
    where
        S: IntoIterator,
        S::Item: Into<Key>,
    {
        let mut nodes = nodes.into_iter().map(Into::into);
        let Some(hub) = nodes.next() else {
            return;
        };
        self.add_node(hub.clone());

        for spoke in nodes {
            self.insert_record(EdgeRecord::with_attrs(hub.clone(), spoke, attrs.clone()));
        }
    }
}

impl<G: EdgeOps> Substructures for G {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attrs, prelude::*};

    #[test]
    fn path_of_one_adds_a_node() {
        let mut g = Graph::new();
        g.add_path(["only"]);
        assert_eq!(g.order(), 1);
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn empty_substructures_are_noops() {
        let mut g = Graph::new();
        g.add_path(Vec::<Key>::new());
        g.add_cycle(Vec::<Key>::new());
        g.add_star(Vec::<Key>::new());
        assert!(g.is_empty());
    }

    #[test]
    fn cycle_of_one_is_a_selfloop() {
        let mut g = Graph::new();
        g.add_cycle([7]);
        assert_eq!(g.size(), 1);
        assert_eq!(g.degree_of(&7.into()), Ok(2));
    }

    #[test]
    fn cycle_closes_back() {
        let mut g = Graph::new();
        g.add_cycle([0, 3, 1, 4]);
        assert_eq!(g.size(), 4);
        assert!(g.has_edge(&4.into(), &0.into()));
    }

    #[test]
    fn star_with_attrs() {
        let mut g = MultiGraph::new();
        g.add_star_with([0, 1, 2], &attrs! { "kind" => "spoke" });

        assert_eq!(g.size(), 2);
        assert_eq!(
            *g.get_edge_data(&0.into(), &2.into(), &Key::Int(0)).unwrap(),
            attrs! { "kind" => "spoke" }
        );
    }

    #[test]
    fn directed_path_orientation() {
        let mut g = DiGraph::new();
        g.add_path([0, 1, 2]);
        assert!(g.has_edge(&0.into(), &1.into()));
        assert!(!g.has_edge(&1.into(), &0.into()));
    }
}
