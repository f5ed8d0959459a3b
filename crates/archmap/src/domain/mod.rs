//! Domain types for architecture tracking.
//!
//! This module contains the core domain types: nodes, typed edges,
//! per-version progress rows and linked feature files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of node in the architecture graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Grouping node; members are attached through `CONTAINS` edges
    Layer,

    /// Buildable component
    Component,

    /// Data store
    Store,

    /// Application entry point
    App,

    /// Third-party system outside the project
    External,
}

impl NodeType {
    /// Layers exist purely for containment and never take part in build ordering.
    #[must_use]
    pub fn is_layer(self) -> bool {
        self == NodeType::Layer
    }

    /// Lowercase name as used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Layer => "layer",
            NodeType::Component => "component",
            NodeType::Store => "store",
            NodeType::App => "app",
            NodeType::External => "external",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex of the architecture graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier; never changes after creation
    pub id: NodeId,

    /// Display name
    pub name: String,

    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Parent layer (a layer-type node id), if any
    #[serde(default)]
    pub layer: Option<NodeId>,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Node {
    /// Create a node with no layer, description or tags.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            layer: None,
            description: None,
            tags: BTreeSet::new(),
        }
    }

    /// Set the parent layer.
    #[must_use]
    pub fn in_layer(mut self, layer: impl Into<NodeId>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Whether this node is a layer.
    #[must_use]
    pub fn is_layer(&self) -> bool {
        self.node_type.is_layer()
    }
}

/// Type of relationship between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// Layer -> member containment
    Contains,

    /// Build dependency: source depends on target
    DependsOn,

    /// Source controls target
    Controls,

    /// Source reads from target
    ReadsFrom,

    /// Source writes to target
    WritesTo,

    /// Source dispatches events to target
    Dispatches,
}

impl EdgeType {
    /// Every edge type except `CONTAINS` is a relationship edge.
    #[must_use]
    pub fn is_relationship(self) -> bool {
        self != EdgeType::Contains
    }
}

/// A directed, typed edge between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Numeric id assigned on persistence
    #[serde(default)]
    pub id: u64,

    /// Source node id
    pub source_id: NodeId,

    /// Target node id
    pub target_id: NodeId,

    /// Relationship type
    #[serde(rename = "type")]
    pub edge_type: EdgeType,

    /// Optional label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Data for creating a new edge; the id is assigned by the repository
#[derive(Debug, Clone)]
pub struct NewEdge {
    /// Source node id
    pub source_id: NodeId,

    /// Target node id
    pub target_id: NodeId,

    /// Relationship type
    pub edge_type: EdgeType,

    /// Optional label
    pub label: Option<String>,
}

impl NewEdge {
    /// Create an unlabelled edge.
    pub fn new(
        source_id: impl Into<NodeId>,
        target_id: impl Into<NodeId>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            edge_type,
            label: None,
        }
    }
}

/// A named project phase. Ordered from earliest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionTag {
    /// Architecture overview
    Overview,

    /// Minimum viable product
    Mvp,

    /// First release
    V1,

    /// Second release
    V2,

    /// Third release
    V3,
}

impl VersionTag {
    /// All tags in phase order.
    pub const ALL: [VersionTag; 5] = [
        VersionTag::Overview,
        VersionTag::Mvp,
        VersionTag::V1,
        VersionTag::V2,
        VersionTag::V3,
    ];

    /// Tags rolled up by the layer overview unless configured otherwise.
    pub const DEFAULT_TRACKED: [VersionTag; 3] = [VersionTag::Mvp, VersionTag::V1, VersionTag::V2];

    /// Lowercase name as used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VersionTag::Overview => "overview",
            VersionTag::Mvp => "mvp",
            VersionTag::V1 => "v1",
            VersionTag::V2 => "v2",
            VersionTag::V3 => "v3",
        }
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown version tag '{s}' (expected one of overview, mvp, v1, v2, v3)")
            })
    }
}

/// Progress status of a component for one version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionStatus {
    /// Not started
    #[default]
    Planned,

    /// Work under way
    InProgress,

    /// Done
    Complete,
}

/// Per-component progress for one version tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Component this row belongs to
    pub node_id: NodeId,

    /// Version tag
    pub version: VersionTag,

    /// Version-specific description
    #[serde(default)]
    pub content: Option<String>,

    /// Progress percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    /// Status
    #[serde(default)]
    pub status: VersionStatus,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Version {
    /// Create a version row with the given progress and status.
    pub fn new(
        node_id: impl Into<NodeId>,
        version: VersionTag,
        progress: u8,
        status: VersionStatus,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            version,
            content: None,
            progress: progress.min(100),
            status,
            updated_at: Utc::now(),
        }
    }

    /// The implicit row of a component that has none stored for `version`.
    pub fn planned(node_id: impl Into<NodeId>, version: VersionTag) -> Self {
        Self::new(node_id, version, 0, VersionStatus::Planned)
    }

    /// Complete when marked complete or at 100%.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == VersionStatus::Complete || self.progress >= 100
    }
}

/// A BDD feature file linked to a component version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Component this feature belongs to
    pub node_id: NodeId,

    /// Version tag
    pub version: VersionTag,

    /// File name, unique per `(node_id, version)`
    pub filename: String,

    /// Feature title
    #[serde(default)]
    pub title: String,

    /// Number of scenario steps in the file
    #[serde(default)]
    pub step_count: u32,

    /// Number of those steps implemented
    #[serde(default)]
    pub steps_completed: u32,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Feature {
    /// Create a feature with no completed steps.
    pub fn new(
        node_id: impl Into<NodeId>,
        version: VersionTag,
        filename: impl Into<String>,
        step_count: u32,
    ) -> Self {
        let filename = filename.into();
        Self {
            node_id: node_id.into(),
            version,
            title: filename.trim_end_matches(".feature").to_string(),
            filename,
            step_count,
            steps_completed: 0,
            updated_at: Utc::now(),
        }
    }

    /// Set the number of implemented steps.
    #[must_use]
    pub fn with_completed(mut self, steps_completed: u32) -> Self {
        self.steps_completed = steps_completed;
        self
    }
}

/// Step totals across the features of one component version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepSummary {
    /// Sum of `step_count`
    pub total_steps: u32,

    /// Sum of `steps_completed`, capped per feature at its `step_count`
    pub completed_steps: u32,

    /// Number of features
    pub feature_count: u32,
}

impl StepSummary {
    /// Fold a list of features into a summary.
    pub fn from_features<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Self {
        features
            .into_iter()
            .fold(StepSummary::default(), |mut acc, feature| {
                acc.total_steps += feature.step_count;
                acc.completed_steps += feature.steps_completed.min(feature.step_count);
                acc.feature_count += 1;
                acc
            })
    }

    /// Step coverage as a percentage (0-100); zero when there are no steps.
    #[must_use]
    pub fn coverage(&self) -> u8 {
        if self.total_steps == 0 {
            return 0;
        }
        let pct = u64::from(self.completed_steps) * 100 / u64::from(self.total_steps);
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::mvp("mvp", Some(VersionTag::Mvp))]
    #[case::uppercase("V1", Some(VersionTag::V1))]
    #[case::padded(" v2 ", Some(VersionTag::V2))]
    #[case::overview("overview", Some(VersionTag::Overview))]
    #[case::unknown("v9", None)]
    #[case::empty("", None)]
    fn test_parse_version_tag(#[case] input: &str, #[case] expected: Option<VersionTag>) {
        assert_eq!(input.parse::<VersionTag>().ok(), expected);
    }

    #[test]
    fn test_version_tags_are_phase_ordered() {
        let mut tags = vec![VersionTag::V2, VersionTag::Overview, VersionTag::V1, VersionTag::Mvp];
        tags.sort();
        assert_eq!(
            tags,
            vec![VersionTag::Overview, VersionTag::Mvp, VersionTag::V1, VersionTag::V2]
        );
    }

    #[rstest]
    #[case::planned(0, VersionStatus::Planned, false)]
    #[case::partial(60, VersionStatus::InProgress, false)]
    #[case::full_progress(100, VersionStatus::InProgress, true)]
    #[case::marked_complete(80, VersionStatus::Complete, true)]
    fn test_version_is_complete(
        #[case] progress: u8,
        #[case] status: VersionStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(Version::new("a", VersionTag::Mvp, progress, status).is_complete(), expected);
    }

    #[test]
    fn test_version_progress_is_capped() {
        let version = Version::new("a", VersionTag::Mvp, 250, VersionStatus::InProgress);
        assert_eq!(version.progress, 100);
    }

    #[test]
    fn test_step_summary_from_features() {
        let features = [
            Feature::new("a", VersionTag::Mvp, "login.feature", 4).with_completed(2),
            Feature::new("a", VersionTag::Mvp, "logout.feature", 6).with_completed(9),
        ];
        let summary = StepSummary::from_features(&features);

        assert_eq!(summary.total_steps, 10);
        assert_eq!(summary.completed_steps, 8);
        assert_eq!(summary.feature_count, 2);
        assert_eq!(summary.coverage(), 80);
    }

    #[test]
    fn test_step_summary_coverage_without_steps() {
        assert_eq!(StepSummary::default().coverage(), 0);
    }

    #[test]
    fn test_node_serializes_type_field() {
        let node = Node::new("api", "API", NodeType::Component).in_layer("backend");
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "component");
        assert_eq!(json["layer"], "backend");
    }

    #[test]
    fn test_edge_type_wire_names() {
        assert_eq!(
            serde_json::to_value(EdgeType::DependsOn).unwrap(),
            serde_json::json!("DEPENDS_ON")
        );
        assert_eq!(
            serde_json::from_str::<EdgeType>("\"READS_FROM\"").unwrap(),
            EdgeType::ReadsFrom
        );
        assert!(!EdgeType::Contains.is_relationship());
        assert!(EdgeType::WritesTo.is_relationship());
    }

    #[test]
    fn test_version_status_wire_names() {
        assert_eq!(
            serde_json::to_value(VersionStatus::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
    }
}
