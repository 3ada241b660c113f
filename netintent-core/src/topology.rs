use serde::Serialize;

/// A node identifier, interned as a plain string. Never derived by splitting
/// another string on a delimiter — edges are keyed by `(NodeId, NodeId)` pairs,
/// not by a composite string.
pub type NodeId = String;

/// A single directed link with a positive-integer weight variable, represented
/// here by the z3 integer constant it is bound to once the oracle's context exists.
/// The topology itself is backend-agnostic: it only records which directed edges exist.
///
/// Built from the nested `{node1: {name}, node2: {name}}` wire shape by
/// `loader::load_topology`, not derived directly on this type.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub node1: NodeId,
    pub node2: NodeId,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Topology {
    pub routers: Vec<NodeId>,
    pub links: Vec<Link>,
}

impl Topology {
    /// All directed edges implied by the undirected links: each link yields both directions.
    pub fn directed_edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::with_capacity(self.links.len() * 2);
        for link in &self.links {
            edges.push((link.node1.clone(), link.node2.clone()));
            edges.push((link.node2.clone(), link.node1.clone()));
        }
        edges
    }

    pub fn node_set(&self) -> std::collections::BTreeSet<NodeId> {
        self.routers.iter().cloned().collect()
    }
}
