//! Repository trait implementations for in-memory storage.

use super::InMemoryStore;
use crate::domain::{
    Edge, EdgeType, Feature, Node, NodeId, NodeType, StepSummary, Version, VersionTag,
};
use crate::error::Result;
use crate::storage::{EdgeRepository, FeatureRepository, NodeRepository, VersionRepository};
use async_trait::async_trait;

#[async_trait]
impl NodeRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Node>> {
        let inner = self.inner.read().await;
        Ok(inner.nodes.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &NodeId) -> Result<Option<Node>> {
        let inner = self.inner.read().await;
        Ok(inner.nodes.get(id).cloned())
    }

    async fn find_by_type(&self, node_type: NodeType) -> Result<Vec<Node>> {
        let inner = self.inner.read().await;
        Ok(inner
            .nodes
            .values()
            .filter(|node| node.node_type == node_type)
            .cloned()
            .collect())
    }

    async fn find_by_layer(&self, layer_id: &NodeId) -> Result<Vec<Node>> {
        let inner = self.inner.read().await;
        Ok(inner
            .nodes
            .values()
            .filter(|node| node.layer.as_ref() == Some(layer_id))
            .cloned()
            .collect())
    }

    async fn exists(&self, id: &NodeId) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner.nodes.contains_key(id))
    }
}

#[async_trait]
impl EdgeRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Edge>> {
        let inner = self.inner.read().await;
        Ok(inner.edges.values().cloned().collect())
    }

    async fn find_by_source(&self, source_id: &NodeId) -> Result<Vec<Edge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .values()
            .filter(|edge| &edge.source_id == source_id)
            .cloned()
            .collect())
    }

    async fn find_by_target(&self, target_id: &NodeId) -> Result<Vec<Edge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .values()
            .filter(|edge| &edge.target_id == target_id)
            .cloned()
            .collect())
    }

    async fn find_by_type(&self, edge_type: EdgeType) -> Result<Vec<Edge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .values()
            .filter(|edge| edge.edge_type == edge_type)
            .cloned()
            .collect())
    }

    async fn find_relationships(&self) -> Result<Vec<Edge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .values()
            .filter(|edge| edge.edge_type.is_relationship())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl VersionRepository for InMemoryStore {
    async fn find_by_node(&self, node_id: &NodeId) -> Result<Vec<Version>> {
        let inner = self.inner.read().await;
        Ok(inner
            .versions
            .range((node_id.clone(), VersionTag::Overview)..=(node_id.clone(), VersionTag::V3))
            .map(|(_, version)| version.clone())
            .collect())
    }

    async fn find_by_node_and_version(
        &self,
        node_id: &NodeId,
        version: VersionTag,
    ) -> Result<Option<Version>> {
        let inner = self.inner.read().await;
        Ok(inner.versions.get(&(node_id.clone(), version)).cloned())
    }
}

#[async_trait]
impl FeatureRepository for InMemoryStore {
    async fn find_by_node(&self, node_id: &NodeId) -> Result<Vec<Feature>> {
        let inner = self.inner.read().await;
        Ok(inner
            .features
            .values()
            .filter(|feature| &feature.node_id == node_id)
            .cloned()
            .collect())
    }

    async fn find_by_node_and_version(
        &self,
        node_id: &NodeId,
        version: VersionTag,
    ) -> Result<Vec<Feature>> {
        let inner = self.inner.read().await;
        Ok(inner
            .features
            .values()
            .filter(|feature| &feature.node_id == node_id && feature.version == version)
            .cloned()
            .collect())
    }

    async fn step_summary(&self, node_id: &NodeId, version: VersionTag) -> Result<StepSummary> {
        let inner = self.inner.read().await;
        Ok(StepSummary::from_features(inner.features.values().filter(
            |feature| &feature.node_id == node_id && feature.version == version,
        )))
    }
}
