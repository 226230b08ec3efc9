/// Every graph variant should satisfy the shared structural invariants
macro_rules! test_graph_variants {
    ($env:ident, $graph:ident, undirected) => {
        #[cfg(test)]
        mod $env {
            use crate::{prelude::*, testing::test_graph_variants};
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            test_graph_variants!(@common $graph);

            #[test]
            fn adjacency_is_symmetric() {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);

                for n in [5i64, 10, 20] {
                    for _ in 0..10 {
                        let graph = $graph::from_edges(random_edges(rng, n, (n * 3) as usize));

                        for u in graph.nodes() {
                            for v in graph.neighbors(u).unwrap() {
                                assert!(graph.neighbors(v).unwrap().any(|w| w == u));
                                assert_eq!(
                                    graph.number_of_edges_between(u, v),
                                    graph.number_of_edges_between(v, u)
                                );
                            }
                        }
                    }
                }
            }

            #[test]
            fn degree_sum_is_twice_the_size() {
                let rng = &mut Pcg64Mcg::seed_from_u64(4);

                for _ in 0..20 {
                    let graph = $graph::from_edges(random_edges(rng, 12, 40));
                    let total: usize = graph.nodes().map(|u| graph.degree_of(u).unwrap()).sum();
                    assert_eq!(total, 2 * graph.size());
                }
            }
        }
    };
    ($env:ident, $graph:ident, directed) => {
        #[cfg(test)]
        mod $env {
            use crate::{prelude::*, testing::test_graph_variants};
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            test_graph_variants!(@common $graph);

            #[test]
            fn successors_mirror_predecessors() {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);

                for n in [5i64, 10, 20] {
                    for _ in 0..10 {
                        let graph = $graph::from_edges(random_edges(rng, n, (n * 3) as usize));

                        for u in graph.nodes() {
                            for v in graph.successors(u).unwrap() {
                                assert!(graph.predecessors(v).unwrap().any(|w| w == u));
                            }
                            for p in graph.predecessors(u).unwrap() {
                                assert!(graph.successors(p).unwrap().any(|w| w == u));
                            }
                        }
                    }
                }
            }

            #[test]
            fn degree_splits_into_in_and_out() {
                let rng = &mut Pcg64Mcg::seed_from_u64(4);

                for _ in 0..20 {
                    let graph = $graph::from_edges(random_edges(rng, 12, 40));

                    let ins: usize = graph.nodes().map(|u| graph.in_degree_of(u).unwrap()).sum();
                    let outs: usize = graph.nodes().map(|u| graph.out_degree_of(u).unwrap()).sum();
                    assert_eq!(ins, graph.size());
                    assert_eq!(outs, graph.size());

                    for u in graph.nodes() {
                        assert_eq!(
                            graph.degree_of(u).unwrap(),
                            graph.in_degree_of(u).unwrap() + graph.out_degree_of(u).unwrap()
                        );
                    }
                }
            }
        }
    };
    (@common $graph:ident) => {
        /// Creates `m` random edges over the integer keys `0..n`
        fn random_edges<R: Rng>(rng: &mut R, n: i64, m: usize) -> Vec<(i64, i64)> {
            (0..m)
                .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
                .collect_vec()
        }

        #[test]
        fn new_graph_is_empty() {
            let graph = $graph::new();
            assert!(graph.is_empty());
            assert_eq!(graph.order(), 0);
            assert_eq!(graph.size(), 0);
        }

        #[test]
        fn adjacency_and_node_map_agree() {
            let rng = &mut Pcg64Mcg::seed_from_u64(1);

            for _ in 0..10 {
                let graph = $graph::from_edges(random_edges(rng, 15, 40));
                assert_eq!(graph.node_list().len(), graph.order());

                for u in graph.nodes() {
                    for v in graph.neighbors(u).unwrap() {
                        assert!(graph.has_node(v));
                    }
                }
            }
        }

        #[test]
        fn each_edge_is_enumerated_once() {
            let rng = &mut Pcg64Mcg::seed_from_u64(2);

            for _ in 0..10 {
                let graph = $graph::from_edges(random_edges(rng, 10, 30));
                assert_eq!(graph.edges().count(), graph.size());
                assert_eq!(graph.edge_records().len(), graph.size());
            }
        }

        #[test]
        fn removing_all_records_empties_the_edge_set() {
            let rng = &mut Pcg64Mcg::seed_from_u64(5);

            let mut graph = $graph::from_edges(random_edges(rng, 10, 30));
            let order = graph.order();

            let records = graph.edge_records();
            graph.remove_edges_from(records);

            assert_eq!(graph.size(), 0);
            assert_eq!(graph.order(), order);
            let total: usize = graph.nodes().map(|u| graph.degree_of(u).unwrap()).sum();
            assert_eq!(total, 0);
        }

        #[test]
        fn removing_all_nodes_clears_the_graph() {
            let rng = &mut Pcg64Mcg::seed_from_u64(6);

            let mut graph = $graph::from_edges(random_edges(rng, 10, 30));
            for n in graph.node_list() {
                graph.remove_node(&n).unwrap();
            }

            assert!(graph.is_empty());
            assert_eq!(graph.size(), 0);
        }
    };
}

pub(crate) use test_graph_variants;
