//! Route handlers.
//!
//! Each handler validates its parameters, calls exactly one engine
//! operation and encodes the result as JSON.

use crate::error::ApiResult;
use crate::params::{
    DepthParams, HopsParams, PathParams, VersionParams, parse_count, parse_version, require_id,
};
use crate::state::AppState;
use archmap::domain::NodeId;
use archmap::query::{
    ComponentContext, ComponentProgress, DependencyNode, ImplementationOrder, LayerSummary,
    Neighbourhood, NodeSummary, PathResult, StatusBuckets,
};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /api/components/{id}/dependencies`
///
/// # Errors
///
/// 400 for a malformed `depth`, 404 for an unknown id.
pub async fn dependencies(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DepthParams>,
) -> ApiResult<Json<Vec<DependencyNode>>> {
    let depth = state
        .limits
        .depth(parse_count("depth", params.depth.as_deref())?);
    let tree = state
        .queries
        .dependency_tree(&NodeId::from(id), depth)
        .await?;
    Ok(Json(tree))
}

/// `GET /api/components/{id}/dependents`
///
/// # Errors
///
/// 404 for an unknown id.
pub async fn dependents(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<NodeSummary>>> {
    Ok(Json(state.queries.dependents(&NodeId::from(id)).await?))
}

/// `GET /api/components/{id}/context`
///
/// # Errors
///
/// 404 for an unknown id.
pub async fn context(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ComponentContext>> {
    Ok(Json(state.queries.context(&NodeId::from(id)).await?))
}

/// `GET /api/components/{id}/neighbourhood`
///
/// # Errors
///
/// 400 for a malformed `hops`, 404 for an unknown id.
pub async fn neighbourhood(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HopsParams>,
) -> ApiResult<Json<Neighbourhood>> {
    let hops = state
        .limits
        .hops(parse_count("hops", params.hops.as_deref())?);
    Ok(Json(
        state.queries.neighbourhood(&NodeId::from(id), hops).await?,
    ))
}

/// `GET /api/graph/implementation-order`
///
/// 200 with `{"order": [...]}`, or 409 with `{"cycle": [...]}`.
///
/// # Errors
///
/// 500 on storage failure.
pub async fn implementation_order(State(state): State<AppState>) -> ApiResult<Response> {
    let result = state.queries.implementation_order().await?;
    let status = match result {
        ImplementationOrder::Order(_) => StatusCode::OK,
        ImplementationOrder::Cycle(_) => StatusCode::CONFLICT,
    };
    Ok((status, Json(result)).into_response())
}

/// `GET /api/graph/components-by-status`
///
/// # Errors
///
/// 400 for an unknown `version`.
pub async fn components_by_status(
    State(state): State<AppState>,
    Query(params): Query<VersionParams>,
) -> ApiResult<Json<StatusBuckets>> {
    let version = parse_version(params.version.as_deref())?;
    Ok(Json(state.queries.by_status(version).await?))
}

/// `GET /api/graph/next-implementable`
///
/// # Errors
///
/// 400 for an unknown `version`.
pub async fn next_implementable(
    State(state): State<AppState>,
    Query(params): Query<VersionParams>,
) -> ApiResult<Json<Vec<ComponentProgress>>> {
    let version = parse_version(params.version.as_deref())?;
    Ok(Json(state.queries.next_implementable(version).await?))
}

/// `GET /api/graph/path`
///
/// # Errors
///
/// 400 when `from` or `to` is missing or empty.
pub async fn path(
    State(state): State<AppState>,
    Query(params): Query<PathParams>,
) -> ApiResult<Json<PathResult>> {
    let from = require_id("from", params.from.as_deref())?;
    let to = require_id("to", params.to.as_deref())?;
    Ok(Json(state.queries.shortest_path(&from, &to).await?))
}

/// `GET /api/graph/layer-overview`
///
/// # Errors
///
/// 500 on storage failure.
pub async fn layer_overview(State(state): State<AppState>) -> ApiResult<Json<Vec<LayerSummary>>> {
    Ok(Json(state.queries.layer_overview().await?))
}
