//! Dependency trees and direct dependents.

use super::GraphQueries;
use super::snapshot::GraphSnapshot;
use super::types::{DependencyNode, NodeSummary};
use crate::domain::{EdgeType, NodeId};
use crate::error::{Error, Result};
use std::collections::{HashSet, VecDeque};

/// One arena slot of a tree under construction.
struct Slot {
    summary: NodeSummary,
    parent: Option<usize>,
    depth: usize,
    /// `None` until expanded.
    children: Option<Vec<usize>>,
}

/// Build the dependency tree below `root`, following outbound `DEPENDS_ON`
/// edges up to `max_depth` levels.
///
/// Level 1 is the root's direct dependencies. A node's `dependencies` field
/// is populated iff its level is below `max_depth` and it does not already
/// appear on the path from the root (which is how cycles terminate). Edge
/// targets that do not resolve to a node are skipped, as are repeated
/// targets under the same parent. `max_depth == 0` yields an empty list.
#[must_use]
pub fn dependency_tree(
    snapshot: &GraphSnapshot,
    root: &NodeId,
    max_depth: usize,
) -> Vec<DependencyNode> {
    if max_depth == 0 {
        return Vec::new();
    }

    let mut arena: Vec<Slot> = Vec::new();
    let mut queue = VecDeque::new();
    let top = attach_dependencies(snapshot, root, None, 1, &mut arena, &mut queue);

    // Breadth-first so arena indices grow with depth
    while let Some(idx) = queue.pop_front() {
        let depth = arena[idx].depth;
        if depth >= max_depth || on_path(&arena, root, idx) {
            continue;
        }
        let id = arena[idx].summary.id.clone();
        let children =
            attach_dependencies(snapshot, &id, Some(idx), depth + 1, &mut arena, &mut queue);
        arena[idx].children = Some(children);
    }

    // Children always sit at higher indices than their parent, so a reverse
    // sweep finishes every subtree before its parent needs it.
    let mut built: Vec<Option<DependencyNode>> = (0..arena.len()).map(|_| None).collect();
    for (idx, slot) in arena.into_iter().enumerate().rev() {
        let dependencies = slot.children.map(|children| {
            children
                .into_iter()
                .filter_map(|child| built[child].take())
                .collect()
        });
        built[idx] = Some(DependencyNode {
            id: slot.summary.id,
            name: slot.summary.name,
            node_type: slot.summary.node_type,
            dependencies,
        });
    }

    top.into_iter().filter_map(|idx| built[idx].take()).collect()
}

fn attach_dependencies(
    snapshot: &GraphSnapshot,
    id: &NodeId,
    parent: Option<usize>,
    depth: usize,
    arena: &mut Vec<Slot>,
    queue: &mut VecDeque<usize>,
) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut children = Vec::new();
    for edge in snapshot.outbound(id) {
        if edge.edge_type != EdgeType::DependsOn || !seen.insert(&edge.target_id) {
            continue;
        }
        let Some(target) = snapshot.node(&edge.target_id) else {
            continue;
        };
        let idx = arena.len();
        arena.push(Slot {
            summary: NodeSummary::from(target),
            parent,
            depth,
            children: None,
        });
        queue.push_back(idx);
        children.push(idx);
    }
    children
}

/// Whether the node in slot `idx` is the root or one of its own ancestors.
fn on_path(arena: &[Slot], root: &NodeId, idx: usize) -> bool {
    let id = &arena[idx].summary.id;
    if id == root {
        return true;
    }
    let mut cursor = arena[idx].parent;
    while let Some(ancestor) = cursor {
        if &arena[ancestor].summary.id == id {
            return true;
        }
        cursor = arena[ancestor].parent;
    }
    false
}

impl GraphQueries {
    /// Dependency tree below `root`; see [`dependency_tree`].
    ///
    /// # Errors
    ///
    /// Returns `Error::NodeNotFound` if `root` does not exist.
    pub async fn dependency_tree(
        &self,
        root: &NodeId,
        max_depth: usize,
    ) -> Result<Vec<DependencyNode>> {
        if !self.repos.nodes.exists(root).await? {
            return Err(Error::NodeNotFound(root.clone()));
        }
        let snapshot = self.snapshot_of_type(EdgeType::DependsOn).await?;
        let tree = dependency_tree(&snapshot, root, max_depth);
        tracing::debug!(root = %root, max_depth, top_level = tree.len(), "Built dependency tree");
        Ok(tree)
    }

    /// Nodes with a `DEPENDS_ON` edge into `id`, one entry per source.
    ///
    /// Sources that do not resolve to a node are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::NodeNotFound` if `id` does not exist.
    pub async fn dependents(&self, id: &NodeId) -> Result<Vec<NodeSummary>> {
        if !self.repos.nodes.exists(id).await? {
            return Err(Error::NodeNotFound(id.clone()));
        }

        let mut seen = HashSet::new();
        let mut dependents = Vec::new();
        for edge in self.repos.edges.find_by_target(id).await? {
            if edge.edge_type != EdgeType::DependsOn || !seen.insert(edge.source_id.clone()) {
                continue;
            }
            if let Some(source) = self.repos.nodes.find_by_id(&edge.source_id).await? {
                dependents.push(NodeSummary::from(&source));
            }
        }
        Ok(dependents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::GraphFixture;
    use rstest::rstest;

    fn ids(nodes: &[DependencyNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn find<'a>(nodes: &'a [DependencyNode], id: &str) -> &'a DependencyNode {
        nodes
            .iter()
            .find(|n| n.id.as_str() == id)
            .unwrap_or_else(|| panic!("{id} not in tree"))
    }

    #[tokio::test]
    async fn test_depth_one_lists_direct_dependencies_unexpanded() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .component("c")
            .depends_on("a", "b")
            .depends_on("b", "c")
            .queries()
            .await;

        let tree = queries.dependency_tree(&"a".into(), 1).await.unwrap();

        assert_eq!(ids(&tree), vec!["b"]);
        assert!(tree[0].dependencies.is_none());
    }

    #[tokio::test]
    async fn test_depth_two_expands_first_level() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .component("c")
            .component("d")
            .depends_on("a", "b")
            .depends_on("a", "d")
            .depends_on("b", "c")
            .queries()
            .await;

        let tree = queries.dependency_tree(&"a".into(), 2).await.unwrap();

        assert_eq!(ids(&tree), vec!["b", "d"]);
        let b = find(&tree, "b");
        let b_deps = b.dependencies.as_deref().unwrap();
        assert_eq!(ids(b_deps), vec!["c"]);
        assert!(b_deps[0].dependencies.is_none());
        // Expanded but empty
        assert_eq!(find(&tree, "d").dependencies.as_deref(), Some(&[][..]));
    }

    #[rstest]
    #[case::two_cycle(&[("a", "b"), ("b", "a")], 5)]
    #[case::three_cycle(&[("a", "b"), ("b", "c"), ("c", "a")], 10)]
    #[case::self_loop(&[("a", "a")], 3)]
    #[tokio::test]
    async fn test_cycles_terminate(#[case] edges: &[(&str, &str)], #[case] depth: usize) {
        let mut fixture = GraphFixture::new().component("a").component("b").component("c");
        for (source, target) in edges {
            fixture = fixture.depends_on(source, target);
        }
        let queries = fixture.queries().await;

        let tree = queries.dependency_tree(&"a".into(), depth).await.unwrap();

        // Walk down the single chain: it must end at "a" with no expansion
        let mut level = tree.as_slice();
        loop {
            assert_eq!(level.len(), 1);
            match &level[0].dependencies {
                Some(children) => level = children,
                None => break,
            }
        }
        assert_eq!(level[0].id.as_str(), "a");
    }

    #[tokio::test]
    async fn test_diamond_repeats_shared_dependency() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .component("c")
            .component("d")
            .depends_on("a", "b")
            .depends_on("a", "c")
            .depends_on("b", "d")
            .depends_on("c", "d")
            .queries()
            .await;

        let tree = queries.dependency_tree(&"a".into(), 3).await.unwrap();

        for branch in ["b", "c"] {
            let deps = find(&tree, branch).dependencies.as_deref().unwrap();
            assert_eq!(ids(deps), vec!["d"]);
            assert_eq!(deps[0].dependencies.as_deref(), Some(&[][..]));
        }
    }

    #[tokio::test]
    async fn test_skips_unresolved_and_repeated_targets() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .depends_on("a", "ghost")
            .depends_on("a", "b")
            .depends_on("a", "b")
            .queries()
            .await;

        let tree = queries.dependency_tree(&"a".into(), 1).await.unwrap();

        assert_eq!(ids(&tree), vec!["b"]);
    }

    #[tokio::test]
    async fn test_zero_depth_is_empty() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .depends_on("a", "b")
            .queries()
            .await;

        assert!(queries.dependency_tree(&"a".into(), 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_root() {
        let queries = GraphFixture::new().queries().await;

        let result = queries.dependency_tree(&"nope".into(), 1).await;
        assert!(matches!(result, Err(Error::NodeNotFound(id)) if id.as_str() == "nope"));
    }

    #[tokio::test]
    async fn test_dependents() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .component("c")
            .depends_on("a", "c")
            .depends_on("b", "c")
            .depends_on("b", "c")
            .depends_on("ghost", "c")
            .edge("a", "c", EdgeType::ReadsFrom)
            .queries()
            .await;

        let dependents = queries.dependents(&"c".into()).await.unwrap();
        let ids: Vec<_> = dependents.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        assert!(queries.dependents(&"a".into()).await.unwrap().is_empty());
        assert!(matches!(
            queries.dependents(&"missing".into()).await,
            Err(Error::NodeNotFound(_))
        ));
    }
}
