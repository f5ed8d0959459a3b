//! Query-string parameters and their validation.
//!
//! Every field is taken as an optional raw string so that malformed values
//! surface as a JSON `400` from [`ApiError`] rather than as an extractor
//! rejection.

use crate::error::ApiError;
use archmap::domain::{NodeId, VersionTag};
use serde::Deserialize;

/// `?depth=N`
#[derive(Debug, Default, Deserialize)]
pub struct DepthParams {
    /// Requested tree depth
    pub depth: Option<String>,
}

/// `?hops=N`
#[derive(Debug, Default, Deserialize)]
pub struct HopsParams {
    /// Requested neighbourhood radius
    pub hops: Option<String>,
}

/// `?version=V`
#[derive(Debug, Default, Deserialize)]
pub struct VersionParams {
    /// Version tag, defaults to `mvp`
    pub version: Option<String>,
}

/// `?from=A&to=B`
#[derive(Debug, Default, Deserialize)]
pub struct PathParams {
    /// Path source
    pub from: Option<String>,
    /// Path destination
    pub to: Option<String>,
}

/// Parse an optional non-negative count.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` if the value is present but not a
/// non-negative integer.
pub fn parse_count(name: &str, raw: Option<&str>) -> Result<Option<usize>, ApiError> {
    raw.map(|value| {
        value.trim().parse::<usize>().map_err(|_| {
            ApiError::BadRequest(format!(
                "'{name}' must be a non-negative integer, got '{value}'"
            ))
        })
    })
    .transpose()
}

/// Parse an optional version tag, defaulting to `mvp`.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` for an unknown tag.
pub fn parse_version(raw: Option<&str>) -> Result<VersionTag, ApiError> {
    match raw {
        None => Ok(VersionTag::Mvp),
        Some(value) => value.parse().map_err(ApiError::BadRequest),
    }
}

/// Require a non-empty node id.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` if the value is missing or blank.
pub fn require_id(name: &str, raw: Option<&str>) -> Result<NodeId, ApiError> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(NodeId::from(value)),
        _ => Err(ApiError::BadRequest(format!(
            "query parameter '{name}' is required"
        ))),
    }
}
