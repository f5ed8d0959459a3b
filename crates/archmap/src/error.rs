//! Error types for archmap operations.
//!
//! A cycle in the dependency graph is not an error: implementation order
//! reports it as [`crate::query::ImplementationOrder::Cycle`].

use crate::domain::NodeId;
use std::io;
use thiserror::Error;

/// The error type for archmap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The requested root, center or component id does not resolve to a node.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
}

/// Errors raised by repository backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A node with the same id already exists.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file is not valid YAML for [`crate::config::ArchmapConfig`].
    #[error("Configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration parsed but holds unusable values.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A specialized Result type for archmap operations.
pub type Result<T> = std::result::Result<T, Error>;
