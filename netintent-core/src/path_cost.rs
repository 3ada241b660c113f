use std::collections::HashMap;

use pathfinding::prelude::yen;

use crate::topology::{NodeId, Topology};

/// A concrete assignment of positive integer weights to every directed edge,
/// instantiated from one model produced by the oracle's SMT context. Used by the
/// CEGAR loop to search for counterexample paths against a live topology.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    weights: HashMap<(NodeId, NodeId), i64>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
}

impl WeightedGraph {
    pub fn new(topology: &Topology, weights: HashMap<(NodeId, NodeId), i64>) -> Self {
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for link in &topology.links {
            adjacency.entry(link.node1.clone()).or_default().push(link.node2.clone());
            adjacency.entry(link.node2.clone()).or_default().push(link.node1.clone());
        }
        Self { weights, adjacency }
    }

    pub fn edge_weight(&self, u: &str, v: &str) -> i64 {
        *self
            .weights
            .get(&(u.to_string(), v.to_string()))
            .unwrap_or_else(|| panic!("missing edge weight for ({u}, {v})"))
    }

    pub fn path_cost(&self, path: &[NodeId]) -> i64 {
        path.windows(2).map(|w| self.edge_weight(&w[0], &w[1])).sum()
    }

    /// The `k` lowest-cost loopless `src -> dst` paths, in non-decreasing cost order,
    /// found via Yen's algorithm over the live-weighted topology.
    pub fn k_shortest_paths(&self, src: &NodeId, dst: &NodeId, k: usize) -> Vec<(Vec<NodeId>, i64)> {
        let empty: Vec<NodeId> = Vec::new();
        let dst = dst.clone();
        let result = yen(
            src,
            |node: &NodeId| {
                self.adjacency
                    .get(node)
                    .unwrap_or(&empty)
                    .iter()
                    .map(|next| (next.clone(), self.edge_weight(node, next)))
                    .collect::<Vec<_>>()
            },
            |node: &NodeId| *node == dst,
            k,
        );
        result.into_iter().collect()
    }

    /// All `src -> dst` paths tied for the minimum cost, bounded by scanning the
    /// first `width` candidates from `k_shortest_paths`.
    pub fn all_shortest_paths(&self, src: &NodeId, dst: &NodeId, width: usize) -> Vec<Vec<NodeId>> {
        let candidates = self.k_shortest_paths(src, dst, width);
        match candidates.first().map(|(_, cost)| cost.clone()) {
            None => Vec::new(),
            Some(min_cost) => candidates
                .into_iter()
                .take_while(|(_, cost)| *cost == min_cost)
                .map(|(path, _)| path)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Link;

    fn triangle_with_chord() -> (Topology, HashMap<(NodeId, NodeId), i64>) {
        let topology = Topology {
            routers: vec!["A".into(), "B".into(), "C".into()],
            links: vec![
                Link { node1: "A".into(), node2: "B".into() },
                Link { node1: "B".into(), node2: "C".into() },
                Link { node1: "A".into(), node2: "C".into() },
            ],
        };
        let mut weights = HashMap::new();
        for (u, v) in topology.directed_edges() {
            weights.insert((u, v), 1);
        }
        (topology, weights)
    }

    #[test]
    fn k_shortest_paths_orders_by_nondecreasing_cost() {
        let (topology, weights) = triangle_with_chord();
        let graph = WeightedGraph::new(&topology, weights);
        let paths = graph.k_shortest_paths(&"A".to_string(), &"C".to_string(), 5);
        assert!(!paths.is_empty());
        for pair in paths.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn all_shortest_paths_ties_under_equal_weights() {
        let (topology, weights) = triangle_with_chord();
        let graph = WeightedGraph::new(&topology, weights);
        let shortest = graph.all_shortest_paths(&"A".to_string(), &"C".to_string(), 5);
        assert_eq!(shortest.len(), 2);
    }
}
