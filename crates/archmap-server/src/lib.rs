//! HTTP server for archmap graph queries.
//!
//! Each route is a thin adapter over one [`archmap::query::GraphQueries`]
//! operation. Query parameters are validated here; the engine never sees
//! malformed input.
//!
//! # Routes
//!
//! ## Components
//! - `GET /api/components/{id}/dependencies?depth=N` - dependency tree
//! - `GET /api/components/{id}/dependents` - direct dependents
//! - `GET /api/components/{id}/context` - aggregated component view
//! - `GET /api/components/{id}/neighbourhood?hops=N` - nearby nodes and edges
//!
//! ## Graph
//! - `GET /api/graph/implementation-order` - build order, or 409 with a cycle
//! - `GET /api/graph/components-by-status?version=V` - status buckets
//! - `GET /api/graph/next-implementable?version=V` - unblocked components
//! - `GET /api/graph/path?from=A&to=B` - shortest path
//! - `GET /api/graph/layer-overview` - per-layer rollup
//!
//! ## Service
//! - `GET /health` - liveness

pub mod cli;
pub mod error;
pub mod handlers;
pub mod params;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
