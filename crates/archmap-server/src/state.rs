//! Shared handler state.

use archmap::config::{ArchmapConfig, TraversalLimits};
use archmap::error::Result;
use archmap::query::GraphQueries;
use archmap::storage::in_memory::{LoadWarning, load_from_jsonl};

/// State cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The query engine
    pub queries: GraphQueries,

    /// Bounds for `depth` and `hops`
    pub limits: TraversalLimits,
}

impl AppState {
    /// Wrap an engine with the given traversal limits.
    #[must_use]
    pub fn new(queries: GraphQueries, limits: TraversalLimits) -> Self {
        Self { queries, limits }
    }

    /// Load the configured JSONL snapshot into an in-memory store.
    ///
    /// Load warnings are logged and returned; they do not fail the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file exists but cannot be read.
    pub async fn load(config: &ArchmapConfig) -> Result<(Self, Vec<LoadWarning>)> {
        let (store, warnings) = load_from_jsonl(&config.data_file).await?;
        for warning in &warnings {
            tracing::warn!(?warning, "Graph load warning");
        }

        let (nodes, edges) = store.counts().await;
        tracing::info!(
            data_file = %config.data_file.display(),
            nodes,
            edges,
            warnings = warnings.len(),
            "Graph loaded"
        );

        let queries = GraphQueries::new(store.repositories())
            .with_tracked_versions(config.tracked_versions.clone());
        Ok((Self::new(queries, config.limits), warnings))
    }
}
