//! Progress rollups: status buckets, ready work and per-layer summaries.

use super::GraphQueries;
use super::snapshot::GraphSnapshot;
use super::types::{ComponentProgress, LayerSummary, StatusBuckets};
use crate::domain::{EdgeType, Node, NodeId, StepSummary, Version, VersionTag};
use crate::error::Result;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Version rows and step totals of every component for one tag.
///
/// Components without a stored row get [`Version::planned`].
struct ProgressIndex {
    rows: HashMap<NodeId, (Version, StepSummary)>,
}

impl ProgressIndex {
    fn get(&self, id: &NodeId) -> Option<&(Version, StepSummary)> {
        self.rows.get(id)
    }

    fn is_complete(&self, id: &NodeId) -> bool {
        self.get(id).is_some_and(|(version, _)| version.is_complete())
    }

    fn progress_of(&self, node: &Node) -> Option<ComponentProgress> {
        self.get(&node.id)
            .map(|(version, summary)| ComponentProgress::new(node, version, *summary))
    }
}

impl GraphQueries {
    async fn progress_index(
        &self,
        snapshot: &GraphSnapshot,
        version: VersionTag,
    ) -> Result<ProgressIndex> {
        let mut rows = HashMap::new();
        for node in snapshot.components() {
            let row = self
                .repos
                .versions
                .find_by_node_and_version(&node.id, version)
                .await?
                .unwrap_or_else(|| Version::planned(node.id.clone(), version));
            let summary = self.repos.features.step_summary(&node.id, version).await?;
            rows.insert(node.id.clone(), (row, summary));
        }
        Ok(ProgressIndex { rows })
    }

    /// Bucket every non-layer node by its progress for `version`.
    ///
    /// Complete means status complete or progress 100; otherwise a node is in
    /// progress when its progress is above 0 and planned when it is 0.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn by_status(&self, version: VersionTag) -> Result<StatusBuckets> {
        let snapshot = self.snapshot_with(Vec::new()).await?;
        let index = self.progress_index(&snapshot, version).await?;

        let mut buckets = StatusBuckets {
            version,
            complete: Vec::new(),
            in_progress: Vec::new(),
            planned: Vec::new(),
        };
        for node in snapshot.components() {
            let Some(entry) = index.progress_of(node) else {
                continue;
            };
            if index.is_complete(&node.id) {
                buckets.complete.push(entry);
            } else if entry.progress > 0 {
                buckets.in_progress.push(entry);
            } else {
                buckets.planned.push(entry);
            }
        }

        tracing::debug!(
            %version,
            complete = buckets.complete.len(),
            in_progress = buckets.in_progress.len(),
            planned = buckets.planned.len(),
            "Bucketed components by status"
        );
        Ok(buckets)
    }

    /// Non-layer nodes that are not complete for `version` but whose every
    /// `DEPENDS_ON` dependency (among non-layer nodes) is.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn next_implementable(&self, version: VersionTag) -> Result<Vec<ComponentProgress>> {
        let snapshot = self.snapshot_of_type(EdgeType::DependsOn).await?;
        let index = self.progress_index(&snapshot, version).await?;

        let ready = snapshot
            .components()
            .filter(|node| !index.is_complete(&node.id))
            .filter(|node| {
                snapshot
                    .outbound(&node.id)
                    .iter()
                    .filter(|edge| edge.edge_type == EdgeType::DependsOn)
                    .filter(|edge| snapshot.is_component(&edge.target_id))
                    .all(|edge| index.is_complete(&edge.target_id))
            })
            .filter_map(|node| index.progress_of(node))
            .collect::<Vec<_>>();

        tracing::debug!(%version, ready = ready.len(), "Computed next implementable");
        Ok(ready)
    }

    /// One summary per layer, in id order.
    ///
    /// Members are the non-layer targets of the layer's `CONTAINS` edges.
    /// `completed` counts complete members per tracked tag; `progress` is the
    /// rounded mean of member progress over every (member, tracked tag) pair,
    /// with missing rows counting as 0.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn layer_overview(&self) -> Result<Vec<LayerSummary>> {
        let snapshot = self.snapshot_of_type(EdgeType::Contains).await?;
        let mut summaries = Vec::new();

        for layer in snapshot.layers() {
            let mut seen = HashSet::new();
            let members: Vec<&NodeId> = snapshot
                .outbound(&layer.id)
                .iter()
                .filter(|edge| edge.edge_type == EdgeType::Contains)
                .map(|edge| &edge.target_id)
                .filter(|id| snapshot.is_component(id))
                .filter(|id| seen.insert(*id))
                .collect();

            let mut completed: BTreeMap<VersionTag, usize> =
                self.tracked_versions.iter().map(|&tag| (tag, 0)).collect();
            let mut progress_sum: u64 = 0;

            for member in &members {
                let rows = self.repos.versions.find_by_node(member).await?;
                for &tag in &self.tracked_versions {
                    let Some(row) = rows.iter().find(|row| row.version == tag) else {
                        continue;
                    };
                    progress_sum += u64::from(row.progress);
                    if row.is_complete() {
                        *completed.entry(tag).or_default() += 1;
                    }
                }
            }

            let cells =
                u64::try_from(members.len() * self.tracked_versions.len()).unwrap_or(u64::MAX);
            let progress = if cells == 0 {
                0
            } else {
                u8::try_from((progress_sum + cells / 2) / cells).unwrap_or(100)
            };

            summaries.push(LayerSummary {
                id: layer.id.clone(),
                name: layer.name.clone(),
                component_count: members.len(),
                completed,
                progress,
            });
        }

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{Feature, Version, VersionStatus, VersionTag};
    use crate::testing::GraphFixture;

    fn ids<T>(entries: &[T], id: impl Fn(&T) -> &str) -> Vec<&str> {
        entries.iter().map(id).collect()
    }

    #[tokio::test]
    async fn test_by_status_buckets() {
        let queries = GraphFixture::new()
            .layer("core")
            .component("done")
            .component("marked")
            .component("half")
            .component("fresh")
            .component("silent")
            .progress("done", VersionTag::Mvp, 100)
            .version(Version::new("marked", VersionTag::Mvp, 60, VersionStatus::Complete))
            .progress("half", VersionTag::Mvp, 50)
            .progress("fresh", VersionTag::Mvp, 0)
            .progress("silent", VersionTag::V1, 90)
            .queries()
            .await;

        let buckets = queries.by_status(VersionTag::Mvp).await.unwrap();

        assert_eq!(ids(&buckets.complete, |c| c.id.as_str()), vec!["done", "marked"]);
        assert_eq!(ids(&buckets.in_progress, |c| c.id.as_str()), vec!["half"]);
        // No mvp row counts as planned; the layer is never listed
        assert_eq!(ids(&buckets.planned, |c| c.id.as_str()), vec!["fresh", "silent"]);
    }

    #[tokio::test]
    async fn test_by_status_includes_step_coverage() {
        let queries = GraphFixture::new()
            .component("api")
            .progress("api", VersionTag::Mvp, 30)
            .feature(Feature::new("api", VersionTag::Mvp, "login.feature", 4).with_completed(1))
            .queries()
            .await;

        let buckets = queries.by_status(VersionTag::Mvp).await.unwrap();
        let api = &buckets.in_progress[0];

        assert_eq!(api.total_steps, 4);
        assert_eq!(api.feature_count, 1);
        assert_eq!(api.step_coverage, 25);
    }

    #[tokio::test]
    async fn test_next_implementable() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .component("c")
            .component("d")
            .depends_on("a", "b")
            .depends_on("b", "c")
            .depends_on("d", "ghost")
            .progress("c", VersionTag::Mvp, 100)
            .queries()
            .await;

        let ready = queries.next_implementable(VersionTag::Mvp).await.unwrap();

        // c is complete, b's only dependency is complete, a waits on b,
        // d's only dependency does not resolve
        assert_eq!(ids(&ready, |c| c.id.as_str()), vec!["b", "d"]);
    }

    #[tokio::test]
    async fn test_next_implementable_ignores_layer_dependencies() {
        let queries = GraphFixture::new()
            .layer("core")
            .component_in("a", "core")
            .depends_on("a", "core")
            .queries()
            .await;

        let ready = queries.next_implementable(VersionTag::V1).await.unwrap();
        assert_eq!(ids(&ready, |c| c.id.as_str()), vec!["a"]);
    }

    #[tokio::test]
    async fn test_next_implementable_self_loop_never_ready() {
        let queries = GraphFixture::new()
            .component("a")
            .depends_on("a", "a")
            .queries()
            .await;

        assert!(queries.next_implementable(VersionTag::Mvp).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_layer_overview() {
        let queries = GraphFixture::new()
            .layer("backend")
            .layer("empty")
            .component_in("api", "backend")
            .component_in("db", "backend")
            .edge("backend", "db", crate::domain::EdgeType::Contains)
            .edge("backend", "ghost", crate::domain::EdgeType::Contains)
            .progress("api", VersionTag::Mvp, 100)
            .progress("api", VersionTag::V1, 50)
            .progress("db", VersionTag::Mvp, 100)
            .progress("db", VersionTag::V3, 100)
            .queries()
            .await;

        let overview = queries.layer_overview().await.unwrap();

        assert_eq!(ids(&overview, |l| l.id.as_str()), vec!["backend", "empty"]);
        let backend = &overview[0];
        assert_eq!(backend.component_count, 2);
        assert_eq!(backend.completed[&VersionTag::Mvp], 2);
        assert_eq!(backend.completed[&VersionTag::V1], 0);
        assert_eq!(backend.completed[&VersionTag::V2], 0);
        assert!(!backend.completed.contains_key(&VersionTag::V3));
        // (100 + 50 + 0 + 100 + 0 + 0) / 6 = 41.67
        assert_eq!(backend.progress, 42);

        let empty = &overview[1];
        assert_eq!(empty.component_count, 0);
        assert_eq!(empty.progress, 0);
    }

    #[tokio::test]
    async fn test_layer_overview_custom_tracked_versions() {
        let queries = GraphFixture::new()
            .layer("ui")
            .component_in("web", "ui")
            .progress("web", VersionTag::V3, 80)
            .queries()
            .await
            .with_tracked_versions(vec![VersionTag::V3]);

        let overview = queries.layer_overview().await.unwrap();

        assert_eq!(overview[0].progress, 80);
        assert_eq!(overview[0].completed.len(), 1);
    }
}
