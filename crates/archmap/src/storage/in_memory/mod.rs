//! In-memory storage backend.
//!
//! This module provides a fast, **ephemeral** repository implementation where
//! all records are held in RAM. It backs the HTTP server (seeded from a JSONL
//! file at startup) and every test in the workspace.
//!
//! # Persistence
//!
//! - **In-memory only**: use [`InMemoryStore::new`] and the seeding methods
//! - **From disk**: use [`load_from_jsonl`] to build a store from a JSONL snapshot
//!
//! # Cascading deletes
//!
//! [`InMemoryStore::remove_node`] removes the node's edges, versions and
//! features with it. Edges may still reference missing nodes when they are
//! inserted that way (or loaded from a file that contains them); the query
//! engine treats such dangling references as normal data.
//!
//! # Thread Safety
//!
//! The store is a cheap clonable handle around `Arc<RwLock<StoreInner>>`.
//! Repository reads take the read lock, so concurrent queries never block
//! one another.

mod inner;
mod jsonl;
mod trait_impl;

use crate::domain::{Edge, Feature, NewEdge, Node, NodeId, Version};
use crate::error::Result;
use crate::storage::Repositories;
use inner::StoreInner;
use std::sync::Arc;
use tokio::sync::RwLock;

// Re-export public API
pub use jsonl::{LoadWarning, Record, load_from_jsonl};

/// Thread-safe in-memory store implementing every repository trait.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle this store as the four repositories the query engine reads.
    #[must_use]
    pub fn repositories(&self) -> Repositories {
        Repositories {
            nodes: Arc::new(self.clone()),
            edges: Arc::new(self.clone()),
            versions: Arc::new(self.clone()),
            features: Arc::new(self.clone()),
        }
    }

    /// Insert a node.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateNode` if the id is already taken.
    pub async fn insert_node(&self, node: Node) -> Result<()> {
        self.inner.write().await.insert_node(node)
    }

    /// Insert an edge and return it with its assigned id.
    pub async fn insert_edge(&self, edge: NewEdge) -> Edge {
        self.inner.write().await.insert_edge(edge)
    }

    /// Insert or replace the version row for `(node_id, version)`.
    pub async fn upsert_version(&self, version: Version) {
        self.inner.write().await.upsert_version(version);
    }

    /// Insert or replace the feature for `(node_id, version, filename)`.
    pub async fn upsert_feature(&self, feature: Feature) {
        self.inner.write().await.upsert_feature(feature);
    }

    /// Delete a node and cascade to its edges, versions and features.
    ///
    /// Returns `false` if the node did not exist.
    pub async fn remove_node(&self, id: &NodeId) -> bool {
        self.inner.write().await.remove_node(id)
    }

    /// Delete a single edge by id. Returns `false` if it did not exist.
    pub async fn remove_edge(&self, edge_id: u64) -> bool {
        self.inner.write().await.remove_edge(edge_id)
    }

    /// Number of stored nodes and edges.
    pub async fn counts(&self) -> (usize, usize) {
        let inner = self.inner.read().await;
        (inner.nodes.len(), inner.edges.len())
    }
}
