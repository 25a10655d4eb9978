// Dijkstra shortest paths over a Graph
use crate::graph::Graph;
use crate::map::{HashtableMap, MapKey};
use crate::{Error, Result};
use ordered_float::OrderedFloat;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use std::hash::Hash;

/// One path explored during a search: the node it ends at, its total cost
/// and the index of the search node it extends (None for the start).
#[derive(Debug)]
struct SearchNode<'g, N> {
    label: &'g N,
    cost: f64,
    predecessor: Option<usize>,
}

/// Heap entry pointing into the search node arena
#[derive(Clone, Copy, PartialEq, Eq)]
struct Candidate {
    cost: OrderedFloat<f64>,
    idx: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: lower cost first, earlier insertion breaks ties
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Search nodes produced by one query plus the one that reached the target.
struct SearchTree<'g, N> {
    arena: Vec<SearchNode<'g, N>>,
    end: usize,
}

impl<'g, N: Clone> SearchTree<'g, N> {
    fn cost(&self) -> f64 {
        self.arena[self.end].cost
    }

    /// Labels from start to end, following predecessor links backwards.
    fn path(&self) -> Vec<N> {
        let mut path = Vec::new();
        let mut current = Some(self.end);
        while let Some(idx) = current {
            let node = &self.arena[idx];
            path.push(node.label.clone());
            current = node.predecessor;
        }
        path.reverse();
        path
    }
}

impl<N: MapKey + Clone> Graph<N> {
    /// Core search. Stale heap entries are skipped once their node is
    /// finalized instead of being removed on relaxation, and the search
    /// stops as soon as `end` is finalized.
    fn compute_shortest_path<Q>(&self, start: &Q, end: &Q) -> Result<SearchTree<'_, N>>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let start_node = self
            .node(start)
            .ok_or_else(|| Error::NodeNotFound(format!("{start:?}")))?;
        if !self.contains_node(end) {
            return Err(Error::NodeNotFound(format!("{end:?}")));
        }

        let mut arena = vec![SearchNode {
            label: &start_node.label,
            cost: 0.0,
            predecessor: None,
        }];
        let mut queue = BinaryHeap::new();
        queue.push(Candidate { cost: OrderedFloat(0.0), idx: 0 });
        let mut finalized: HashtableMap<&N, usize> = HashtableMap::new();
        let mut popped = 0usize;

        while let Some(Candidate { idx, .. }) = queue.pop() {
            popped += 1;
            let label = arena[idx].label;
            let cost = arena[idx].cost;
            if finalized.contains_key(&label) {
                continue;
            }
            finalized.put(label, idx)?;

            let reached: &Q = label.borrow();
            if reached == end {
                tracing::trace!(popped, explored = arena.len(), cost, "path found");
                return Ok(SearchTree { arena, end: idx });
            }

            let Some(node) = self.node::<N>(label) else {
                continue;
            };
            for edge in &node.edges_leaving {
                if finalized.contains_key(&&edge.successor) {
                    continue;
                }
                let next_cost = cost + edge.weight;
                arena.push(SearchNode {
                    label: &edge.successor,
                    cost: next_cost,
                    predecessor: Some(idx),
                });
                queue.push(Candidate {
                    cost: OrderedFloat(next_cost),
                    idx: arena.len() - 1,
                });
            }
        }

        tracing::trace!(popped, explored = arena.len(), "queue exhausted");
        Err(Error::NoPathFound {
            from: format!("{start:?}"),
            to: format!("{end:?}"),
        })
    }

    /// Labels along the cheapest path from `start` to `end`, both included.
    ///
    /// Fails with [`Error::NodeNotFound`] if either label is absent and with
    /// [`Error::NoPathFound`] if `end` cannot be reached.
    pub fn shortest_path_data<Q>(&self, start: &Q, end: &Q) -> Result<Vec<N>>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        Ok(self.compute_shortest_path(start, end)?.path())
    }

    /// Total weight of the cheapest path from `start` to `end`.
    ///
    /// Any failure, missing node or unreachable target, yields
    /// `f64::INFINITY` rather than an error.
    pub fn shortest_path_cost<Q>(&self, start: &Q, end: &Q) -> f64
    where
        N: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        match self.compute_shortest_path(start, end) {
            Ok(tree) => tree.cost(),
            Err(e) => {
                tracing::debug!("no cost available: {}", e);
                f64::INFINITY
            }
        }
    }

    /// The other node with the largest finite path cost from `source`.
    ///
    /// Returns `Ok(None)` when nothing else is reachable. Ties keep the
    /// first label in node index order.
    pub fn most_distant_location<Q>(&self, source: &Q) -> Result<Option<N>>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        if !self.contains_node(source) {
            return Err(Error::NodeNotFound(format!("{source:?}")));
        }

        let mut farthest: Option<(N, f64)> = None;
        for label in self.get_all_locations() {
            let candidate: &Q = label.borrow();
            if candidate == source {
                continue;
            }
            let cost = self.shortest_path_cost(source, candidate);
            if !cost.is_finite() {
                continue;
            }
            if farthest.as_ref().map_or(true, |(_, best)| cost > *best) {
                farthest = Some((label, cost));
            }
        }
        Ok(farthest.map(|(label, _)| label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    /// The seven node graph traced in lecture
    fn lecture_graph() -> Graph<String> {
        let mut graph = Graph::new();
        for label in ["A", "B", "C", "D", "E", "F", "G"] {
            graph.insert_node(label.to_string());
        }
        let edges = [
            ("A", "B", 1.0),
            ("B", "C", 4.0),
            ("D", "B", 1.0),
            ("C", "D", 3.0),
            ("E", "C", 2.0),
            ("C", "G", 2.0),
            ("D", "F", 5.0),
            ("E", "G", 4.0),
            ("A", "D", 3.0),
            ("A", "F", 5.0),
            ("F", "E", 4.0),
            ("G", "F", 2.0),
            ("G", "B", 5.0),
            ("E", "D", 3.0),
        ];
        for (from, to, weight) in edges {
            assert!(graph.insert_edge(from, to, weight));
        }
        graph
    }

    fn path_weight(graph: &Graph<String>, path: &[String]) -> f64 {
        path.windows(2)
            .map(|pair| graph.get_edge(pair[0].as_str(), pair[1].as_str()).unwrap())
            .sum()
    }

    #[test]
    fn test_shortest_path_a_to_g() {
        let graph = lecture_graph();
        assert_eq!(graph.shortest_path_data("A", "G").unwrap(), vec!["A", "B", "C", "G"]);
        assert_eq!(graph.shortest_path_cost("A", "G"), 7.0);
    }

    #[test]
    fn test_shortest_path_c_to_f() {
        let graph = lecture_graph();
        assert_eq!(graph.shortest_path_data("C", "F").unwrap(), vec!["C", "G", "F"]);
        assert_eq!(graph.shortest_path_cost("C", "F"), 4.0);
    }

    #[test]
    fn test_no_path() {
        let graph = lecture_graph();
        assert!(matches!(
            graph.shortest_path_data("F", "A"),
            Err(Error::NoPathFound { .. })
        ));
        assert_eq!(graph.shortest_path_cost("F", "A"), f64::INFINITY);
    }

    #[test]
    fn test_missing_nodes() {
        let graph = lecture_graph();
        assert!(matches!(
            graph.shortest_path_data("A", "Z"),
            Err(Error::NodeNotFound(_))
        ));
        assert!(matches!(
            graph.shortest_path_data("Z", "A"),
            Err(Error::NodeNotFound(_))
        ));
        assert_eq!(graph.shortest_path_cost("Z", "A"), f64::INFINITY);
    }

    #[test]
    fn test_start_is_end() {
        let graph = lecture_graph();
        assert_eq!(graph.shortest_path_data("D", "D").unwrap(), vec!["D"]);
        assert_eq!(graph.shortest_path_cost("D", "D"), 0.0);
    }

    #[test]
    fn test_repeat_queries_agree() {
        let graph = lecture_graph();
        let first = graph.shortest_path_data("E", "B").unwrap();
        let second = graph.shortest_path_data("E", "B").unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.shortest_path_cost("E", "B"), graph.shortest_path_cost("E", "B"));
    }

    #[test]
    fn test_path_weight_matches_cost() {
        let graph = lecture_graph();
        for start in graph.get_all_locations() {
            for end in graph.get_all_locations() {
                if let Ok(path) = graph.shortest_path_data(start.as_str(), end.as_str()) {
                    assert_eq!(path.first(), Some(&start));
                    assert_eq!(path.last(), Some(&end));
                    assert_eq!(
                        path_weight(&graph, &path),
                        graph.shortest_path_cost(start.as_str(), end.as_str())
                    );
                }
            }
        }
    }

    #[test]
    fn test_cheaper_route_found_after_first_relaxation() {
        // S -> T is queued at 10 before S -> M -> T at 2 is discovered
        let mut graph: Graph<String> = Graph::new();
        for label in ["S", "M", "T"] {
            graph.insert_node(label.to_string());
        }
        graph.insert_edge("S", "T", 10.0);
        graph.insert_edge("S", "M", 1.0);
        graph.insert_edge("M", "T", 1.0);

        assert_eq!(graph.shortest_path_data("S", "T").unwrap(), vec!["S", "M", "T"]);
        assert_eq!(graph.shortest_path_cost("S", "T"), 2.0);
    }

    #[test]
    fn test_zero_weight_cycle() {
        let mut graph: Graph<u32> = Graph::new();
        for label in 0..3 {
            graph.insert_node(label);
        }
        graph.insert_edge(&0, &1, 0.0);
        graph.insert_edge(&1, &0, 0.0);
        graph.insert_edge(&1, &2, 3.0);
        assert_eq!(graph.shortest_path_data(&0, &2).unwrap(), vec![0, 1, 2]);
        assert_eq!(graph.shortest_path_cost(&0, &2), 3.0);
    }

    #[test]
    fn test_most_distant_location() {
        let graph = lecture_graph();
        // A reaches E only through F: 5 + 4
        assert_eq!(graph.most_distant_location("A").unwrap(), Some("E".to_string()));
    }

    #[test]
    fn test_most_distant_location_none_reachable() {
        let mut graph = lecture_graph();
        graph.insert_node("Island".to_string());
        assert_eq!(graph.most_distant_location("Island").unwrap(), None);
        assert!(matches!(
            graph.most_distant_location("Nowhere"),
            Err(Error::NodeNotFound(_))
        ));
    }

    /// Reference all-pairs costs
    fn floyd_warshall(n: usize, edges: &[(usize, usize, f64)]) -> Vec<Vec<f64>> {
        let mut dist = vec![vec![f64::INFINITY; n]; n];
        for (i, row) in dist.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        for &(from, to, weight) in edges {
            if weight < dist[from][to] {
                dist[from][to] = weight;
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let through = dist[i][k] + dist[k][j];
                    if through < dist[i][j] {
                        dist[i][j] = through;
                    }
                }
            }
        }
        dist
    }

    #[test]
    fn test_random_graphs_match_floyd_warshall() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.random_range(2..12usize);
            let mut graph: Graph<usize> = Graph::new();
            for label in 0..n {
                graph.insert_node(label);
            }

            let mut edges = Vec::new();
            for from in 0..n {
                for to in 0..n {
                    if from != to && rng.random_bool(0.3) {
                        let weight = rng.random_range(0..20u32) as f64;
                        graph.insert_edge(&from, &to, weight);
                        edges.push((from, to, weight));
                    }
                }
            }

            let expected = floyd_warshall(n, &edges);
            for from in 0..n {
                for to in 0..n {
                    assert_eq!(graph.shortest_path_cost(&from, &to), expected[from][to]);
                    match graph.shortest_path_data(&from, &to) {
                        Ok(path) => {
                            let weight: f64 = path
                                .windows(2)
                                .map(|pair| graph.get_edge(&pair[0], &pair[1]).unwrap())
                                .sum();
                            assert_eq!(weight, expected[from][to]);
                        }
                        Err(e) => {
                            assert!(matches!(e, Error::NoPathFound { .. }));
                            assert_eq!(expected[from][to], f64::INFINITY);
                        }
                    }
                }
            }
        }
    }
}
