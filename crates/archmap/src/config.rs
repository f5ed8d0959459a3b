//! Configuration management for archmap.
//!
//! Configuration lives in a YAML file (by default `.archmap/config.yaml`):
//!
//! ```yaml
//! data-file: .archmap/graph.jsonl
//! bind: 127.0.0.1:3000
//! tracked-versions: [mvp, v1, v2]
//! limits:
//!   default-depth: 1
//!   max-depth: 10
//!   default-hops: 1
//!   max-hops: 5
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use crate::domain::VersionTag;
use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the archmap directory
pub const ARCHMAP_DIR_NAME: &str = ".archmap";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the graph data file
pub const GRAPH_FILE_NAME: &str = "graph.jsonl";

/// Default listen address for the HTTP server
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Configuration file structure for archmap
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ArchmapConfig {
    /// Path to the JSONL graph snapshot
    pub data_file: PathBuf,

    /// Listen address for the HTTP server
    pub bind: String,

    /// Version tags rolled up by the layer overview
    pub tracked_versions: Vec<VersionTag>,

    /// Traversal bounds applied at the request boundary
    pub limits: TraversalLimits,
}

/// Defaults and maxima for depth/hop parameters
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct TraversalLimits {
    /// Dependency tree depth when none is requested
    pub default_depth: usize,

    /// Largest dependency tree depth accepted
    pub max_depth: usize,

    /// Neighbourhood radius when none is requested
    pub default_hops: usize,

    /// Largest neighbourhood radius accepted
    pub max_hops: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            default_depth: 1,
            max_depth: 10,
            default_hops: 1,
            max_hops: 5,
        }
    }
}

impl TraversalLimits {
    /// Resolve a requested depth against the configured default and maximum.
    #[must_use]
    pub fn depth(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_depth).min(self.max_depth)
    }

    /// Resolve a requested hop count against the configured default and maximum.
    #[must_use]
    pub fn hops(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_hops).min(self.max_hops)
    }
}

impl Default for ArchmapConfig {
    fn default() -> Self {
        Self {
            data_file: Path::new(ARCHMAP_DIR_NAME).join(GRAPH_FILE_NAME),
            bind: DEFAULT_BIND.to_string(),
            tracked_versions: VersionTag::DEFAULT_TRACKED.to_vec(),
            limits: TraversalLimits::default(),
        }
    }
}

impl ArchmapConfig {
    /// Load configuration from a file and validate it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if it
    /// is not valid YAML or fails [`ArchmapConfig::validate`].
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_yaml::from_str(&content).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration if the file exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Same as [`ArchmapConfig::load`] when the file exists.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if fs::try_exists(path).await? {
            Self::load(path).await
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Check that the values are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for an empty tracked-version list, a zero
    /// maximum, or a default above its maximum.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.tracked_versions.is_empty() {
            return Err(ConfigError::Invalid(
                "tracked-versions must list at least one version".to_string(),
            ));
        }
        let limits = &self.limits;
        if limits.max_depth == 0 || limits.max_hops == 0 {
            return Err(ConfigError::Invalid(
                "max-depth and max-hops must be at least 1".to_string(),
            ));
        }
        if limits.default_depth > limits.max_depth {
            return Err(ConfigError::Invalid(format!(
                "default-depth ({}) exceeds max-depth ({})",
                limits.default_depth, limits.max_depth
            )));
        }
        if limits.default_hops > limits.max_hops {
            return Err(ConfigError::Invalid(format!(
                "default-hops ({}) exceeds max-hops ({})",
                limits.default_hops, limits.max_hops
            )));
        }
        Ok(())
    }
}
