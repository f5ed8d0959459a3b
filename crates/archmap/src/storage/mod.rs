//! Storage abstraction layer for archmap.
//!
//! The query engine never talks to a database directly. It reads through
//! four repository traits, one per stored record kind:
//!
//! - [`NodeRepository`]: components, layers, stores and apps
//! - [`EdgeRepository`]: typed relationships between nodes
//! - [`VersionRepository`]: per-component progress for each version tag
//! - [`FeatureRepository`]: BDD feature files and their step counts
//!
//! # Architecture
//!
//! The traits are async and object-safe. The engine holds them as
//! `Arc<dyn ...>` trait objects inside a [`Repositories`] bundle.
//!
//! # Ordering
//!
//! Every collection is returned fully materialised and in a stable order:
//! nodes by id, edges by edge id, versions by tag, features by tag then
//! file name. Traversals that break ties by iteration order rely on this.
//!
//! # Example
//!
//! ```
//! use archmap::domain::{Node, NodeType};
//! use archmap::storage::in_memory::InMemoryStore;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> archmap::error::Result<()> {
//!     let store = InMemoryStore::new();
//!     store.insert_node(Node::new("api", "API", NodeType::Component)).await?;
//!
//!     let repos = store.repositories();
//!     assert!(repos.nodes.exists(&"api".into()).await?);
//!     Ok(())
//! }
//! ```

use crate::domain::{
    Edge, EdgeType, Feature, Node, NodeId, NodeType, StepSummary, Version, VersionTag,
};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod in_memory;

/// Read access to stored nodes.
#[async_trait]
pub trait NodeRepository: Send + Sync {
    /// All nodes, ordered by id.
    async fn find_all(&self) -> Result<Vec<Node>>;

    /// The node with the given id, if any.
    async fn find_by_id(&self, id: &NodeId) -> Result<Option<Node>>;

    /// All nodes of one type, ordered by id.
    async fn find_by_type(&self, node_type: NodeType) -> Result<Vec<Node>>;

    /// All nodes whose `layer` is the given layer id, ordered by id.
    async fn find_by_layer(&self, layer_id: &NodeId) -> Result<Vec<Node>>;

    /// Whether a node with the given id exists.
    async fn exists(&self, id: &NodeId) -> Result<bool>;
}

/// Read access to stored edges.
#[async_trait]
pub trait EdgeRepository: Send + Sync {
    /// All edges, ordered by edge id.
    async fn find_all(&self) -> Result<Vec<Edge>>;

    /// Edges leaving the given node.
    async fn find_by_source(&self, source_id: &NodeId) -> Result<Vec<Edge>>;

    /// Edges arriving at the given node.
    async fn find_by_target(&self, target_id: &NodeId) -> Result<Vec<Edge>>;

    /// All edges of one type.
    async fn find_by_type(&self, edge_type: EdgeType) -> Result<Vec<Edge>>;

    /// All edges except `CONTAINS`.
    async fn find_relationships(&self) -> Result<Vec<Edge>>;
}

/// Read access to per-component version rows.
#[async_trait]
pub trait VersionRepository: Send + Sync {
    /// Every version row of a node, ordered by tag.
    async fn find_by_node(&self, node_id: &NodeId) -> Result<Vec<Version>>;

    /// The row for one `(node, version)` pair, if stored.
    async fn find_by_node_and_version(
        &self,
        node_id: &NodeId,
        version: VersionTag,
    ) -> Result<Option<Version>>;
}

/// Read access to feature files.
#[async_trait]
pub trait FeatureRepository: Send + Sync {
    /// Every feature of a node, ordered by tag then file name.
    async fn find_by_node(&self, node_id: &NodeId) -> Result<Vec<Feature>>;

    /// Features of one `(node, version)` pair, ordered by file name.
    async fn find_by_node_and_version(
        &self,
        node_id: &NodeId,
        version: VersionTag,
    ) -> Result<Vec<Feature>>;

    /// Step totals for one `(node, version)` pair; all zero when it has no features.
    async fn step_summary(&self, node_id: &NodeId, version: VersionTag) -> Result<StepSummary>;
}

/// The set of repositories the query engine reads from.
#[derive(Clone)]
pub struct Repositories {
    /// Node repository
    pub nodes: Arc<dyn NodeRepository>,

    /// Edge repository
    pub edges: Arc<dyn EdgeRepository>,

    /// Version repository
    pub versions: Arc<dyn VersionRepository>,

    /// Feature repository
    pub features: Arc<dyn FeatureRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories")
            .field("nodes", &"<dyn NodeRepository>")
            .field("edges", &"<dyn EdgeRepository>")
            .field("versions", &"<dyn VersionRepository>")
            .field("features", &"<dyn FeatureRepository>")
            .finish()
    }
}
