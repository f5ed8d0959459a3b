//! Command-line arguments.
//!
//! # Example
//!
//! ```bash
//! archmap-server --config .archmap/config.yaml --bind 0.0.0.0:8080
//! archmap-server --data-file snapshots/graph.jsonl
//! ```

use archmap::config::{ARCHMAP_DIR_NAME, ArchmapConfig, CONFIG_FILE_NAME};
use archmap::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Archmap server - HTTP queries over an architecture graph
///
/// Loads a JSONL graph snapshot into memory and serves dependency, progress
/// and path queries over it.
#[derive(Parser, Debug)]
#[command(name = "archmap-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults are used if it does not exist
    #[arg(long, default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Listen address, overriding the configured one
    #[arg(long)]
    pub bind: Option<String>,

    /// Graph snapshot file, overriding the configured one
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

fn default_config_path() -> PathBuf {
    PathBuf::from(ARCHMAP_DIR_NAME).join(CONFIG_FILE_NAME)
}

impl Cli {
    /// Load the configuration file (or defaults) and apply flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or invalid.
    pub async fn resolve_config(&self) -> Result<ArchmapConfig> {
        let mut config = ArchmapConfig::load_or_default(&self.config).await?;
        if let Some(bind) = &self.bind {
            config.bind.clone_from(bind);
        }
        if let Some(data_file) = &self.data_file {
            config.data_file.clone_from(data_file);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archmap::config::DEFAULT_BIND;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["archmap-server"]);

        assert_eq!(cli.config, default_config_path());
        assert!(cli.bind.is_none());
        assert!(cli.data_file.is_none());
    }

    #[tokio::test]
    async fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yaml");
        tokio::fs::write(&config_path, "bind: 127.0.0.1:9000\ndata-file: from-file.jsonl\n")
            .await
            .unwrap();

        let cli = Cli::parse_from([
            "archmap-server",
            "--config",
            config_path.to_str().unwrap(),
            "--data-file",
            "override.jsonl",
        ]);
        let config = cli.resolve_config().await.unwrap();

        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.data_file, PathBuf::from("override.jsonl"));
    }

    #[tokio::test]
    async fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.yaml");

        let cli = Cli::parse_from(["archmap-server", "--config", missing.to_str().unwrap()]);
        let config = cli.resolve_config().await.unwrap();

        assert_eq!(config.bind, DEFAULT_BIND);
    }
}
