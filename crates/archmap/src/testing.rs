//! Fixture builders for tests.
//!
//! Available inside this crate's tests and, with the `test-util` feature,
//! to downstream crates.
//!
//! ```rust,ignore
//! // [dev-dependencies]
//! // archmap = { path = "...", features = ["test-util"] }
//!
//! use archmap::domain::VersionTag;
//! use archmap::testing::GraphFixture;
//!
//! let queries = GraphFixture::new()
//!     .layer("backend")
//!     .component_in("api", "backend")
//!     .component("db")
//!     .depends_on("api", "db")
//!     .progress("db", VersionTag::Mvp, 100)
//!     .queries()
//!     .await;
//! ```

#![allow(clippy::missing_panics_doc)]

use crate::domain::{
    EdgeType, Feature, NewEdge, Node, NodeType, Version, VersionStatus, VersionTag,
};
use crate::query::GraphQueries;
use crate::storage::in_memory::InMemoryStore;

/// Collects nodes, edges, versions and features, then seeds a store with them.
///
/// Records are inserted in the order they were added, so edge ids follow the
/// order of the builder calls.
#[derive(Debug, Default)]
pub struct GraphFixture {
    nodes: Vec<Node>,
    edges: Vec<NewEdge>,
    versions: Vec<Version>,
    features: Vec<Feature>,
}

impl GraphFixture {
    /// An empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary node.
    #[must_use]
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a layer node whose name is its id.
    #[must_use]
    pub fn layer(self, id: &str) -> Self {
        self.node(Node::new(id, id, NodeType::Layer))
    }

    /// Add a component node with no layer.
    #[must_use]
    pub fn component(self, id: &str) -> Self {
        self.node(Node::new(id, id, NodeType::Component))
    }

    /// Add a component in `layer`, with the `CONTAINS` edge from the layer.
    #[must_use]
    pub fn component_in(self, id: &str, layer: &str) -> Self {
        self.node(Node::new(id, id, NodeType::Component).in_layer(layer))
            .edge(layer, id, EdgeType::Contains)
    }

    /// Add an edge of any type.
    #[must_use]
    pub fn edge(mut self, source: &str, target: &str, edge_type: EdgeType) -> Self {
        self.edges.push(NewEdge::new(source, target, edge_type));
        self
    }

    /// Add a `DEPENDS_ON` edge.
    #[must_use]
    pub fn depends_on(self, source: &str, target: &str) -> Self {
        self.edge(source, target, EdgeType::DependsOn)
    }

    /// Add a version row, deriving status from progress: 0 is planned, 100
    /// is complete, anything else is in progress.
    #[must_use]
    pub fn progress(self, id: &str, version: VersionTag, progress: u8) -> Self {
        let status = match progress {
            0 => VersionStatus::Planned,
            p if p >= 100 => VersionStatus::Complete,
            _ => VersionStatus::InProgress,
        };
        self.version(Version::new(id, version, progress, status))
    }

    /// Add an explicit version row.
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.versions.push(version);
        self
    }

    /// Add a feature.
    #[must_use]
    pub fn feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Seed a fresh in-memory store.
    ///
    /// Panics on duplicate node ids.
    pub async fn build(self) -> InMemoryStore {
        let store = InMemoryStore::new();
        for node in self.nodes {
            store
                .insert_node(node)
                .await
                .expect("fixture node ids must be unique");
        }
        for edge in self.edges {
            store.insert_edge(edge).await;
        }
        for version in self.versions {
            store.upsert_version(version).await;
        }
        for feature in self.features {
            store.upsert_feature(feature).await;
        }
        store
    }

    /// Seed a store and wrap it in a query engine with default tracked versions.
    pub async fn queries(self) -> GraphQueries {
        GraphQueries::new(self.build().await.repositories())
    }
}
