//! Read-only graph queries.
//!
//! [`GraphQueries`] answers structural questions about the architecture
//! graph: dependency trees, build order, progress rollups, shortest paths and
//! neighbourhoods. Every call reads the repositories afresh, builds whatever
//! in-memory structure it needs, and discards it on return; two calls never
//! share state.
//!
//! The graph algorithms themselves are plain functions over a
//! [`GraphSnapshot`] so they can be exercised without a repository:
//!
//! ```
//! use archmap::domain::{Edge, EdgeType, Node, NodeType};
//! use archmap::query::{GraphSnapshot, implementation_order};
//!
//! let snapshot = GraphSnapshot::new(
//!     vec![
//!         Node::new("api", "API", NodeType::Component),
//!         Node::new("db", "DB", NodeType::Store),
//!     ],
//!     vec![Edge {
//!         id: 1,
//!         source_id: "api".into(),
//!         target_id: "db".into(),
//!         edge_type: EdgeType::DependsOn,
//!         label: None,
//!     }],
//! );
//!
//! let order = implementation_order(&snapshot);
//! let ids: Vec<_> = order.order().unwrap().iter().map(|id| id.as_str()).collect();
//! assert_eq!(ids, ["db", "api"]);
//! ```

mod context;
mod dependencies;
mod order;
mod progress;
mod snapshot;
mod traversal;
mod types;

pub use dependencies::dependency_tree;
pub use order::implementation_order;
pub use snapshot::GraphSnapshot;
pub use traversal::{neighbourhood, shortest_path};
pub use types::{
    ComponentContext, ComponentProgress, DependencyNode, ImplementationOrder, LayerSummary,
    Neighbourhood, NodeSummary, PathNode, PathResult, StatusBuckets, VersionContext,
    VersionProgress,
};

use crate::domain::{Edge, EdgeType, Node, NodeId, VersionTag};
use crate::error::{Error, Result};
use crate::storage::Repositories;

/// Query engine over a set of repositories.
#[derive(Debug, Clone)]
pub struct GraphQueries {
    repos: Repositories,
    tracked_versions: Vec<VersionTag>,
}

impl GraphQueries {
    /// Create an engine tracking [`VersionTag::DEFAULT_TRACKED`].
    #[must_use]
    pub fn new(repos: Repositories) -> Self {
        Self {
            repos,
            tracked_versions: VersionTag::DEFAULT_TRACKED.to_vec(),
        }
    }

    /// Replace the version tags rolled up by [`GraphQueries::layer_overview`].
    #[must_use]
    pub fn with_tracked_versions(mut self, tracked_versions: Vec<VersionTag>) -> Self {
        self.tracked_versions = tracked_versions;
        self
    }

    /// The tracked version tags.
    #[must_use]
    pub fn tracked_versions(&self) -> &[VersionTag] {
        &self.tracked_versions
    }

    /// The underlying repositories.
    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Load every node and edge into a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn snapshot(&self) -> Result<GraphSnapshot> {
        let edges = self.repos.edges.find_all().await?;
        self.snapshot_with(edges).await
    }

    /// All nodes plus the given edges.
    async fn snapshot_with(&self, edges: Vec<Edge>) -> Result<GraphSnapshot> {
        let nodes = self.repos.nodes.find_all().await?;
        Ok(GraphSnapshot::new(nodes, edges))
    }

    async fn snapshot_of_type(&self, edge_type: EdgeType) -> Result<GraphSnapshot> {
        let edges = self.repos.edges.find_by_type(edge_type).await?;
        self.snapshot_with(edges).await
    }

    async fn require_node(&self, id: &NodeId) -> Result<Node> {
        self.repos
            .nodes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NodeNotFound(id.clone()))
    }
}
