//! Aggregated read model for a single component.

use super::GraphQueries;
use super::types::{ComponentContext, NodeSummary, VersionContext, VersionProgress};
use crate::domain::{Feature, NodeId, Version, VersionTag};
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};

impl GraphQueries {
    /// Everything known about `id`: versions with step totals, features by
    /// tag, direct dependencies and dependents, layer, siblings and a
    /// per-tag progress map.
    ///
    /// A tag that has features but no stored version row is reported with
    /// an implicit planned row.
    ///
    /// # Errors
    ///
    /// Returns `Error::NodeNotFound` if `id` does not exist.
    pub async fn context(&self, id: &NodeId) -> Result<ComponentContext> {
        let component = self.require_node(id).await?;

        let stored = self.repos.versions.find_by_node(id).await?;
        let all_features = self.repos.features.find_by_node(id).await?;

        let mut features: BTreeMap<VersionTag, Vec<Feature>> = BTreeMap::new();
        for feature in all_features {
            features.entry(feature.version).or_default().push(feature);
        }

        let tags: BTreeSet<VersionTag> = stored
            .iter()
            .map(|version| version.version)
            .chain(features.keys().copied())
            .collect();

        let mut versions = Vec::with_capacity(tags.len());
        for tag in tags {
            let row = stored
                .iter()
                .find(|version| version.version == tag)
                .cloned()
                .unwrap_or_else(|| Version::planned(id.clone(), tag));
            let summary = self.repos.features.step_summary(id, tag).await?;
            versions.push(VersionContext::new(row, summary));
        }

        let progress = versions
            .iter()
            .map(|ctx| (ctx.version.version, VersionProgress::from(ctx)))
            .collect();

        let dependencies = self.dependency_tree(id, 1).await?;
        let dependents = self.dependents(id).await?;

        let (layer, siblings) = match &component.layer {
            Some(layer_id) => {
                let layer = self.repos.nodes.find_by_id(layer_id).await?;
                let siblings = self
                    .repos
                    .nodes
                    .find_by_layer(layer_id)
                    .await?
                    .iter()
                    .filter(|node| &node.id != id)
                    .map(NodeSummary::from)
                    .collect();
                (layer, siblings)
            }
            None => (None, Vec::new()),
        };

        tracing::debug!(
            id = %id,
            versions = versions.len(),
            dependencies = dependencies.len(),
            dependents = dependents.len(),
            "Assembled component context"
        );

        Ok(ComponentContext {
            component,
            versions,
            features,
            dependencies,
            dependents,
            layer,
            siblings,
            progress,
        })
    }
}
