//! Breadth-first traversals over relationship edges.
//!
//! Both traversals ignore `CONTAINS`; layer membership is not a path.

use super::GraphQueries;
use super::snapshot::GraphSnapshot;
use super::types::{Neighbourhood, NodeSummary, PathNode, PathResult};
use crate::domain::{Edge, NodeId};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet, VecDeque};

fn path_node(snapshot: &GraphSnapshot, id: &NodeId) -> PathNode {
    snapshot.node(id).map_or_else(
        || PathNode::Placeholder { id: id.clone() },
        |node| PathNode::Resolved(NodeSummary::from(node)),
    )
}

/// Fewest-edges directed path from `from` to `to`.
///
/// Edges are followed source to target. Among equally short paths the one
/// reached through the lowest edge ids wins. Ids on the path that have no
/// node become [`PathNode::Placeholder`] entries. When `from == to` the path
/// is that single node if it exists; when no path exists both lists are
/// empty.
#[must_use]
pub fn shortest_path(snapshot: &GraphSnapshot, from: &NodeId, to: &NodeId) -> PathResult {
    if from == to {
        return snapshot
            .node(from)
            .map(|node| PathResult {
                path: vec![PathNode::Resolved(NodeSummary::from(node))],
                edges: Vec::new(),
            })
            .unwrap_or_default();
    }

    let mut via: HashMap<&NodeId, &Edge> = HashMap::new();
    let mut visited: HashSet<&NodeId> = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);

    'search: while let Some(current) = queue.pop_front() {
        for edge in snapshot.outbound(current) {
            if !edge.edge_type.is_relationship() {
                continue;
            }
            let next = &edge.target_id;
            if !visited.insert(next) {
                continue;
            }
            via.insert(next, edge);
            if next == to {
                break 'search;
            }
            queue.push_back(next);
        }
    }

    if !via.contains_key(to) {
        return PathResult::default();
    }

    let mut edges = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let Some(&edge) = via.get(cursor) else {
            break;
        };
        edges.push(edge.clone());
        cursor = &edge.source_id;
    }
    edges.reverse();

    let mut path = vec![path_node(snapshot, from)];
    path.extend(edges.iter().map(|edge| path_node(snapshot, &edge.target_id)));

    PathResult { path, edges }
}

/// Nodes within `hops` undirected relationship hops of `center`.
///
/// Only edges whose far end resolves to a node are walked. Nodes come back
/// in discovery order, center first; edges are every relationship edge with
/// both endpoints in the result, in edge-id order. An unknown center yields
/// an empty result.
#[must_use]
pub fn neighbourhood(snapshot: &GraphSnapshot, center: &NodeId, hops: usize) -> Neighbourhood {
    let Some(center_node) = snapshot.node(center) else {
        return Neighbourhood::default();
    };

    let mut nodes = vec![NodeSummary::from(center_node)];
    let mut seen: HashSet<&NodeId> = HashSet::from([&center_node.id]);
    let mut frontier = VecDeque::from([(&center_node.id, 0usize)]);

    while let Some((id, distance)) = frontier.pop_front() {
        if distance >= hops {
            continue;
        }
        let outgoing = snapshot.outbound(id).iter().map(|edge| (edge, &edge.target_id));
        let incoming = snapshot.inbound(id).iter().map(|edge| (edge, &edge.source_id));
        for (edge, other) in outgoing.chain(incoming) {
            if !edge.edge_type.is_relationship() {
                continue;
            }
            let Some(node) = snapshot.node(other) else {
                continue;
            };
            if seen.insert(&node.id) {
                nodes.push(NodeSummary::from(node));
                frontier.push_back((&node.id, distance + 1));
            }
        }
    }

    let edges = snapshot
        .edges()
        .iter()
        .filter(|edge| edge.edge_type.is_relationship())
        .filter(|edge| seen.contains(&edge.source_id) && seen.contains(&edge.target_id))
        .cloned()
        .collect();

    Neighbourhood { nodes, edges }
}

impl GraphQueries {
    /// Shortest directed path over relationship edges; see [`shortest_path`].
    ///
    /// # Errors
    ///
    /// Propagates repository failures. An unknown endpoint is not an error.
    pub async fn shortest_path(&self, from: &NodeId, to: &NodeId) -> Result<PathResult> {
        let edges = self.repos.edges.find_relationships().await?;
        let snapshot = self.snapshot_with(edges).await?;
        let result = shortest_path(&snapshot, from, to);
        tracing::debug!(
            %from,
            %to,
            length = result.edges.len(),
            found = !result.is_empty(),
            "Computed shortest path"
        );
        Ok(result)
    }

    /// Undirected neighbourhood of `center`; see [`neighbourhood`].
    ///
    /// # Errors
    ///
    /// Returns `Error::NodeNotFound` if `center` does not exist.
    pub async fn neighbourhood(&self, center: &NodeId, hops: usize) -> Result<Neighbourhood> {
        let edges = self.repos.edges.find_relationships().await?;
        let snapshot = self.snapshot_with(edges).await?;
        if !snapshot.contains(center) {
            return Err(Error::NodeNotFound(center.clone()));
        }
        Ok(neighbourhood(&snapshot, center, hops))
    }
}
