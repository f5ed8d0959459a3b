//! In-memory adjacency structures built from one repository read.
//!
//! A [`GraphSnapshot`] is assembled fresh for every query and dropped with
//! it; nothing is cached between calls.

use crate::domain::{Edge, Node, NodeId};
use std::collections::HashMap;

/// Nodes and edges with lookup by id and by endpoint.
///
/// Iteration order follows the order the repositories returned: nodes by id,
/// edges by edge id. Edges may reference ids that have no node.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    outbound: HashMap<NodeId, Vec<Edge>>,
    inbound: HashMap<NodeId, Vec<Edge>>,
}

impl GraphSnapshot {
    /// Build a snapshot from already-loaded nodes and edges.
    #[must_use]
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();

        let mut outbound: HashMap<NodeId, Vec<Edge>> = HashMap::new();
        let mut inbound: HashMap<NodeId, Vec<Edge>> = HashMap::new();
        for edge in &edges {
            outbound
                .entry(edge.source_id.clone())
                .or_default()
                .push(edge.clone());
            inbound
                .entry(edge.target_id.clone())
                .or_default()
                .push(edge.clone());
        }

        Self {
            nodes,
            index,
            edges,
            outbound,
            inbound,
        }
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Whether a node is stored under `id`.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// All nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Nodes that are not layers.
    pub fn components(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| !node.is_layer())
    }

    /// Nodes that are layers.
    pub fn layers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_layer())
    }

    /// Whether `id` resolves to a non-layer node.
    #[must_use]
    pub fn is_component(&self, id: &NodeId) -> bool {
        self.node(id).is_some_and(|node| !node.is_layer())
    }

    /// All edges.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `id`.
    #[must_use]
    pub fn outbound(&self, id: &NodeId) -> &[Edge] {
        self.outbound.get(id).map_or(&[], Vec::as_slice)
    }

    /// Edges arriving at `id`.
    #[must_use]
    pub fn inbound(&self, id: &NodeId) -> &[Edge] {
        self.inbound.get(id).map_or(&[], Vec::as_slice)
    }
}
