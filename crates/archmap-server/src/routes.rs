//! Router construction.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Component-scoped queries
        .route(
            "/api/components/{id}/dependencies",
            get(handlers::dependencies),
        )
        .route("/api/components/{id}/dependents", get(handlers::dependents))
        .route("/api/components/{id}/context", get(handlers::context))
        .route(
            "/api/components/{id}/neighbourhood",
            get(handlers::neighbourhood),
        )
        // Whole-graph queries
        .route(
            "/api/graph/implementation-order",
            get(handlers::implementation_order),
        )
        .route(
            "/api/graph/components-by-status",
            get(handlers::components_by_status),
        )
        .route(
            "/api/graph/next-implementable",
            get(handlers::next_implementable),
        )
        .route("/api/graph/path", get(handlers::path))
        .route("/api/graph/layer-overview", get(handlers::layer_overview))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
