//! Core in-memory storage data structures.
//!
//! This module contains the inner storage structure that holds all records
//! and is wrapped in `Arc<RwLock<>>` for thread safety.

use crate::domain::{Edge, Feature, NewEdge, Node, NodeId, Version, VersionTag};
use crate::error::{Result, StorageError};
use std::collections::BTreeMap;

/// Inner storage structure (not thread-safe).
///
/// Ordered maps keep every listing in the stable order promised by the
/// repository traits without a separate sort step.
#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    /// Nodes indexed by id
    pub(super) nodes: BTreeMap<NodeId, Node>,

    /// Edges indexed by their numeric id (insertion order)
    pub(super) edges: BTreeMap<u64, Edge>,

    /// Last assigned edge id
    next_edge_id: u64,

    /// Version rows keyed by `(node, tag)`
    pub(super) versions: BTreeMap<(NodeId, VersionTag), Version>,

    /// Features keyed by `(node, tag, filename)`
    pub(super) features: BTreeMap<(NodeId, VersionTag, String), Feature>,
}

impl StoreInner {
    pub(super) fn insert_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(StorageError::DuplicateNode(node.id).into());
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Store an edge under the next free id. Endpoints are not checked:
    /// dangling edges are representable and tolerated by the query engine.
    pub(super) fn insert_edge(&mut self, new_edge: NewEdge) -> Edge {
        self.next_edge_id += 1;
        let edge = Edge {
            id: self.next_edge_id,
            source_id: new_edge.source_id,
            target_id: new_edge.target_id,
            edge_type: new_edge.edge_type,
            label: new_edge.label,
        };
        self.edges.insert(edge.id, edge.clone());
        edge
    }

    pub(super) fn upsert_version(&mut self, version: Version) {
        self.versions
            .insert((version.node_id.clone(), version.version), version);
    }

    pub(super) fn upsert_feature(&mut self, feature: Feature) {
        self.features.insert(
            (
                feature.node_id.clone(),
                feature.version,
                feature.filename.clone(),
            ),
            feature,
        );
    }

    /// Remove a node together with its edges, versions and features.
    ///
    /// Returns `false` when the node did not exist.
    pub(super) fn remove_node(&mut self, id: &NodeId) -> bool {
        if self.nodes.remove(id).is_none() {
            return false;
        }
        self.edges
            .retain(|_, edge| &edge.source_id != id && &edge.target_id != id);
        self.versions.retain(|(node_id, _), _| node_id != id);
        self.features.retain(|(node_id, _, _), _| node_id != id);
        true
    }

    pub(super) fn remove_edge(&mut self, edge_id: u64) -> bool {
        self.edges.remove(&edge_id).is_some()
    }
}
