//! Result types returned by the query engine.
//!
//! All of these are plain serialisable values; the HTTP layer encodes them
//! as-is.

use crate::domain::{
    Edge, Feature, Node, NodeId, NodeType, StepSummary, Version, VersionStatus, VersionTag,
};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Identity of a node without its layer, tags or description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    /// Node id
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type,
        }
    }
}

/// One entry of a dependency tree.
///
/// `dependencies` is `None` when the node was not expanded (maximum depth
/// reached, or the node already appears on the path from the root) and
/// `Some(vec![])` when it was expanded and has no dependencies. The field is
/// omitted from JSON in the first case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyNode {
    /// Node id
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Expanded dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<DependencyNode>>,
}

/// Outcome of a topological sort of the `DEPENDS_ON` subgraph.
///
/// Serialises as `{"order": [...]}` or `{"cycle": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplementationOrder {
    /// Build order: every dependency appears before its dependents
    Order(Vec<NodeId>),

    /// Witness cycle, starting and ending at the same node
    Cycle(Vec<NodeId>),
}

impl ImplementationOrder {
    /// The build order, if the graph is acyclic.
    #[must_use]
    pub fn order(&self) -> Option<&[NodeId]> {
        match self {
            ImplementationOrder::Order(order) => Some(order),
            ImplementationOrder::Cycle(_) => None,
        }
    }

    /// The witness cycle, if one was found.
    #[must_use]
    pub fn cycle(&self) -> Option<&[NodeId]> {
        match self {
            ImplementationOrder::Cycle(cycle) => Some(cycle),
            ImplementationOrder::Order(_) => None,
        }
    }

    /// Whether a cycle was found.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self, ImplementationOrder::Cycle(_))
    }
}

/// A component's progress for one version tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentProgress {
    /// Node id
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Parent layer
    pub layer: Option<NodeId>,
    /// Explicit progress (0 when no version row exists)
    pub progress: u8,
    /// Explicit status (planned when no version row exists)
    pub status: VersionStatus,
    /// Steps across the version's features
    pub total_steps: u32,
    /// Number of features for the version
    pub feature_count: u32,
    /// Percentage of steps implemented
    pub step_coverage: u8,
}

impl ComponentProgress {
    pub(crate) fn new(node: &Node, version: &Version, summary: StepSummary) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type,
            layer: node.layer.clone(),
            progress: version.progress,
            status: version.status,
            total_steps: summary.total_steps,
            feature_count: summary.feature_count,
            step_coverage: summary.coverage(),
        }
    }
}

/// Components bucketed by completion for one version tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBuckets {
    /// The version tag that was queried
    pub version: VersionTag,
    /// Status complete or progress 100
    pub complete: Vec<ComponentProgress>,
    /// Progress strictly between 0 and 100
    pub in_progress: Vec<ComponentProgress>,
    /// Progress 0
    pub planned: Vec<ComponentProgress>,
}

/// A node on a shortest path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    /// The id resolved to a stored node
    Resolved(NodeSummary),

    /// The id is referenced by an edge but no node is stored under it
    Placeholder {
        /// The dangling id
        id: NodeId,
    },
}

impl PathNode {
    /// The node id, resolved or not.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            PathNode::Resolved(summary) => &summary.id,
            PathNode::Placeholder { id } => id,
        }
    }

    /// Whether this entry stands in for a missing node.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, PathNode::Placeholder { .. })
    }
}

impl Serialize for PathNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathNode::Resolved(summary) => summary.serialize(serializer),
            PathNode::Placeholder { id } => {
                let mut state = serializer.serialize_struct("PathNode", 3)?;
                state.serialize_field("id", id)?;
                state.serialize_field("name", id.as_str())?;
                state.serialize_field("type", "unknown")?;
                state.end()
            }
        }
    }
}

/// Shortest path between two nodes.
///
/// Both lists are empty when no path exists; otherwise
/// `edges.len() == path.len() - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathResult {
    /// Nodes from source to destination
    pub path: Vec<PathNode>,
    /// Edges traversed, in order
    pub edges: Vec<Edge>,
}

impl PathResult {
    /// Whether no path was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Nodes within a hop radius of a center, with the edges among them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Neighbourhood {
    /// Nodes in breadth-first discovery order, center first
    pub nodes: Vec<NodeSummary>,
    /// Relationship edges whose endpoints are both in `nodes`
    pub edges: Vec<Edge>,
}

/// Per-layer rollup of member counts and completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    /// Layer id
    pub id: NodeId,
    /// Layer name
    pub name: String,
    /// Non-layer members attached through `CONTAINS`
    pub component_count: usize,
    /// Members complete per tracked version tag
    pub completed: BTreeMap<VersionTag, usize>,
    /// Mean member progress across all tracked tags (0-100)
    pub progress: u8,
}

/// A version row enriched with feature step totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionContext {
    /// The stored row, or the implicit planned row
    #[serde(flatten)]
    pub version: Version,
    /// Steps across the version's features
    pub total_steps: u32,
    /// Implemented steps across the version's features
    pub completed_steps: u32,
    /// Number of features for the version
    pub feature_count: u32,
    /// Percentage of steps implemented
    pub step_coverage: u8,
}

impl VersionContext {
    pub(crate) fn new(version: Version, summary: StepSummary) -> Self {
        Self {
            version,
            total_steps: summary.total_steps,
            completed_steps: summary.completed_steps,
            feature_count: summary.feature_count,
            step_coverage: summary.coverage(),
        }
    }
}

/// Progress snapshot for one version tag of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionProgress {
    /// Explicit progress
    pub progress: u8,
    /// Explicit status
    pub status: VersionStatus,
    /// Steps across the version's features
    pub total_steps: u32,
    /// Number of features for the version
    pub feature_count: u32,
    /// Percentage of steps implemented
    pub step_coverage: u8,
}

impl From<&VersionContext> for VersionProgress {
    fn from(ctx: &VersionContext) -> Self {
        Self {
            progress: ctx.version.progress,
            status: ctx.version.status,
            total_steps: ctx.total_steps,
            feature_count: ctx.feature_count,
            step_coverage: ctx.step_coverage,
        }
    }
}

/// Everything known about one component, in one read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentContext {
    /// The component itself
    pub component: Node,
    /// Version rows (stored or implied by features), in tag order
    pub versions: Vec<VersionContext>,
    /// Features grouped by version tag
    pub features: BTreeMap<VersionTag, Vec<Feature>>,
    /// Direct dependencies
    pub dependencies: Vec<DependencyNode>,
    /// Direct dependents
    pub dependents: Vec<NodeSummary>,
    /// Parent layer, if it resolves
    pub layer: Option<Node>,
    /// Other nodes in the same layer
    pub siblings: Vec<NodeSummary>,
    /// Progress per version tag
    pub progress: BTreeMap<VersionTag, VersionProgress>,
}
