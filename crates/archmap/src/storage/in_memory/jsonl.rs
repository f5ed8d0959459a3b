//! JSONL loading for in-memory storage.
//!
//! A graph snapshot file holds one [`Record`] per line, tagged by `kind`:
//!
//! ```text
//! {"kind":"node","id":"api","name":"API","type":"component","layer":"backend"}
//! {"kind":"edge","source_id":"api","target_id":"db","type":"DEPENDS_ON"}
//! {"kind":"version","node_id":"api","version":"mvp","progress":40,"status":"in-progress"}
//! {"kind":"feature","node_id":"api","version":"mvp","filename":"auth.feature","step_count":6}
//! ```

use super::InMemoryStore;
use crate::domain::{Edge, Feature, NewEdge, Node, NodeId, Version};
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of a graph snapshot file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    /// A node
    Node(Node),

    /// An edge; its `id` is ignored and reassigned in file order
    Edge(Edge),

    /// A version row
    Version(Version),

    /// A feature file
    Feature(Feature),
}

/// Warnings that can occur during JSONL file loading.
///
/// These are non-fatal: the offending record is skipped (or, for dangling
/// edges, kept) and loading continues.
///
/// **Example:**
/// ```no_run
/// # use archmap::storage::in_memory::{load_from_jsonl, LoadWarning};
/// # use std::path::Path;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> archmap::error::Result<()> {
/// let (store, warnings) = load_from_jsonl(Path::new(".archmap/graph.jsonl")).await?;
///
/// for warning in warnings {
///     match warning {
///         LoadWarning::MalformedJson { line_number, error } => {
///             eprintln!("Skipped malformed JSON at line {line_number}: {error}");
///         }
///         other => eprintln!("{other:?}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Line could not be parsed as a record
    ///
    /// **Effect**: Line is skipped entirely.
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser error message
        error: String,
    },

    /// A node id appeared more than once
    ///
    /// **Effect**: The later record is skipped; the first one wins.
    DuplicateNode {
        /// 1-based line number of the skipped record
        line_number: usize,
        /// The repeated id
        id: NodeId,
    },

    /// A version or feature references a node that is not in the file
    ///
    /// **Effect**: The record is skipped.
    OrphanedRecord {
        /// 1-based line number
        line_number: usize,
        /// The missing node id
        node_id: NodeId,
    },

    /// An edge references a node that is not in the file
    ///
    /// **Effect**: The edge is kept; traversals skip or placeholder it.
    DanglingEdge {
        /// 1-based line number
        line_number: usize,
        /// Edge source
        source_id: NodeId,
        /// Edge target
        target_id: NodeId,
    },

    /// A version row carries a progress value above 100
    ///
    /// **Effect**: The row is kept with progress capped at 100.
    ProgressOutOfRange {
        /// 1-based line number
        line_number: usize,
        /// Component the row belongs to
        node_id: NodeId,
        /// Progress as written in the file
        progress: u8,
    },
}

/// Load a store from a JSONL graph snapshot.
///
/// Nodes are inserted first so that records may appear in any order in the
/// file; edges, versions and features are then applied in file order.
/// A missing file yields an empty store.
///
/// # Errors
///
/// Returns `Error::Io` if the file exists but cannot be read.
pub async fn load_from_jsonl(path: &Path) -> Result<(InMemoryStore, Vec<LoadWarning>)> {
    let store = InMemoryStore::new();
    let mut warnings = Vec::new();

    if !tokio::fs::try_exists(path).await? {
        tracing::debug!(path = %path.display(), "Graph file not found, starting empty");
        return Ok((store, warnings));
    }

    // First pass: parse every line, collecting malformed ones as warnings
    let mut records = Vec::new();
    let mut lines = BufReader::new(File::open(path).await?).lines();
    let mut line_number = 0;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Record>(trimmed) {
            Ok(record) => records.push((line_number, record)),
            Err(e) => warnings.push(LoadWarning::MalformedJson {
                line_number,
                error: e.to_string(),
            }),
        }
    }

    let mut inner = store.inner.write().await;

    // Second pass: nodes
    for (line_number, record) in &records {
        if let Record::Node(node) = record {
            if inner.nodes.contains_key(&node.id) {
                warnings.push(LoadWarning::DuplicateNode {
                    line_number: *line_number,
                    id: node.id.clone(),
                });
                continue;
            }
            inner.insert_node(node.clone())?;
        }
    }

    // Third pass: everything that references nodes
    for (line_number, record) in records {
        match record {
            Record::Node(_) => {}
            Record::Edge(edge) => {
                if !inner.nodes.contains_key(&edge.source_id)
                    || !inner.nodes.contains_key(&edge.target_id)
                {
                    warnings.push(LoadWarning::DanglingEdge {
                        line_number,
                        source_id: edge.source_id.clone(),
                        target_id: edge.target_id.clone(),
                    });
                }
                inner.insert_edge(NewEdge {
                    source_id: edge.source_id,
                    target_id: edge.target_id,
                    edge_type: edge.edge_type,
                    label: edge.label,
                });
            }
            Record::Version(mut version) => {
                if !inner.nodes.contains_key(&version.node_id) {
                    warnings.push(LoadWarning::OrphanedRecord {
                        line_number,
                        node_id: version.node_id,
                    });
                    continue;
                }
                if version.progress > 100 {
                    warnings.push(LoadWarning::ProgressOutOfRange {
                        line_number,
                        node_id: version.node_id.clone(),
                        progress: version.progress,
                    });
                    version.progress = 100;
                }
                inner.upsert_version(version);
            }
            Record::Feature(feature) => {
                if !inner.nodes.contains_key(&feature.node_id) {
                    warnings.push(LoadWarning::OrphanedRecord {
                        line_number,
                        node_id: feature.node_id,
                    });
                    continue;
                }
                inner.upsert_feature(feature);
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        nodes = inner.nodes.len(),
        edges = inner.edges.len(),
        warnings = warnings.len(),
        "Loaded graph snapshot"
    );

    // Release lock before returning
    drop(inner);

    Ok((store, warnings))
}
