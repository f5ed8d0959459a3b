//! Integration tests for the archmap HTTP routes.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` over a
//! seeded in-memory store, covering:
//! - Success shapes for every route
//! - 404 for unknown component ids
//! - 400 for malformed query parameters
//! - 409 for dependency cycles

use archmap::config::TraversalLimits;
use archmap::domain::{EdgeType, Feature, VersionTag};
use archmap::testing::GraphFixture;
use archmap_server::{AppState, create_router};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rstest::rstest;
use serde_json::Value;
use tower::ServiceExt;

mod helpers {
    use super::*;

    /// The reference graph used by most tests:
    ///
    /// ```text
    /// backend: api, auth, db        frontend: web
    /// web -> api -> auth -> db
    ///        api ---------> db
    /// api WRITES_TO cache (no layer)
    /// ```
    pub fn fixture() -> GraphFixture {
        GraphFixture::new()
            .layer("backend")
            .layer("frontend")
            .component_in("api", "backend")
            .component_in("auth", "backend")
            .component_in("db", "backend")
            .component_in("web", "frontend")
            .component("cache")
            .depends_on("web", "api")
            .depends_on("api", "auth")
            .depends_on("api", "db")
            .depends_on("auth", "db")
            .edge("api", "cache", EdgeType::WritesTo)
            .progress("db", VersionTag::Mvp, 100)
            .progress("auth", VersionTag::Mvp, 60)
            .feature(Feature::new("api", VersionTag::Mvp, "login.feature", 8).with_completed(2))
    }

    pub async fn app_state(fixture: GraphFixture) -> AppState {
        AppState::new(fixture.queries().await, TraversalLimits::default())
    }

    /// Issue a GET and return status plus parsed JSON body.
    pub async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, body)
    }

    pub fn ids(value: &Value) -> Vec<&str> {
        value
            .as_array()
            .expect("expected a JSON array")
            .iter()
            .map(|entry| entry["id"].as_str().expect("entry should have an id"))
            .collect()
    }
}

use helpers::{app_state, fixture, get, ids};

// =============================================================================
// Component routes
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app_state(fixture()).await, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_dependencies_default_depth() {
    let (status, body) = get(
        app_state(fixture()).await,
        "/api/components/api/dependencies",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["auth", "db"]);
    assert!(body[0].get("dependencies").is_none());
}

#[tokio::test]
async fn test_dependencies_deeper_tree() {
    let (status, body) = get(
        app_state(fixture()).await,
        "/api/components/web/dependencies?depth=3",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let api = &body[0];
    assert_eq!(api["id"], "api");
    assert_eq!(ids(&api["dependencies"]), vec!["auth", "db"]);
    assert_eq!(ids(&api["dependencies"][0]["dependencies"]), vec!["db"]);
}

#[tokio::test]
async fn test_depth_clamped_to_maximum() {
    let limits = TraversalLimits {
        max_depth: 1,
        ..TraversalLimits::default()
    };
    let state = AppState::new(fixture().queries().await, limits);

    let (status, body) = get(state, "/api/components/web/dependencies?depth=50").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body[0].get("dependencies").is_none());
}

#[tokio::test]
async fn test_dependents() {
    let (status, body) = get(app_state(fixture()).await, "/api/components/db/dependents").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["api", "auth"]);
}

#[tokio::test]
async fn test_context() {
    let (status, body) = get(app_state(fixture()).await, "/api/components/api/context").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["component"]["id"], "api");
    assert_eq!(body["layer"]["id"], "backend");
    assert_eq!(ids(&body["siblings"]), vec!["auth", "db"]);
    assert_eq!(ids(&body["dependents"]), vec!["web"]);
    assert_eq!(body["progress"]["mvp"]["step_coverage"], 25);
    assert_eq!(body["features"]["mvp"][0]["filename"], "login.feature");
}

#[tokio::test]
async fn test_neighbourhood() {
    let (status, body) = get(
        app_state(fixture()).await,
        "/api/components/api/neighbourhood?hops=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["nodes"]), vec!["api", "auth", "db", "cache", "web"]);
    let edge_types: Vec<_> = body["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert!(!edge_types.contains(&"CONTAINS"));
}

#[rstest]
#[case::dependencies("/api/components/ghost/dependencies")]
#[case::dependents("/api/components/ghost/dependents")]
#[case::context("/api/components/ghost/context")]
#[case::neighbourhood("/api/components/ghost/neighbourhood")]
#[tokio::test]
async fn test_unknown_component_is_404(#[case] uri: &str) {
    let (status, body) = get(app_state(fixture()).await, uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

// =============================================================================
// Graph routes
// =============================================================================

#[tokio::test]
async fn test_implementation_order() {
    let (status, body) = get(
        app_state(fixture()).await,
        "/api/graph/implementation-order",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let order: Vec<_> = body["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap())
        .collect();
    assert_eq!(order.len(), 5);
    let pos = |id: &str| order.iter().position(|n| *n == id).unwrap();
    assert!(pos("db") < pos("auth"));
    assert!(pos("auth") < pos("api"));
    assert!(pos("api") < pos("web"));
}

#[tokio::test]
async fn test_implementation_order_cycle_is_409() {
    let state = app_state(fixture().depends_on("db", "web")).await;

    let (status, body) = get(state, "/api/graph/implementation-order").await;

    assert_eq!(status, StatusCode::CONFLICT);
    let cycle = body["cycle"].as_array().unwrap();
    assert_eq!(cycle.first(), cycle.last());
    assert!(body.get("order").is_none());
}

#[tokio::test]
async fn test_components_by_status() {
    let (status, body) = get(
        app_state(fixture()).await,
        "/api/graph/components-by-status?version=mvp",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "mvp");
    assert_eq!(ids(&body["complete"]), vec!["db"]);
    assert_eq!(ids(&body["in_progress"]), vec!["auth"]);
    assert_eq!(ids(&body["planned"]), vec!["api", "cache", "web"]);
}

#[tokio::test]
async fn test_next_implementable_defaults_to_mvp() {
    let (status, body) = get(app_state(fixture()).await, "/api/graph/next-implementable").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["auth", "cache"]);
}

#[tokio::test]
async fn test_path() {
    let (status, body) = get(app_state(fixture()).await, "/api/graph/path?from=web&to=db").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["path"]), vec!["web", "api", "db"]);
    assert_eq!(body["edges"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_path_not_found_is_empty() {
    let (status, body) = get(app_state(fixture()).await, "/api/graph/path?from=db&to=web").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["path"].as_array().unwrap().is_empty());
    assert!(body["edges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_layer_overview() {
    let (status, body) = get(app_state(fixture()).await, "/api/graph/layer-overview").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["backend", "frontend"]);
    assert_eq!(body[0]["component_count"], 3);
    assert_eq!(body[0]["completed"]["mvp"], 1);
    assert_eq!(body[1]["component_count"], 1);
}

// =============================================================================
// Parameter validation
// =============================================================================

#[rstest]
#[case::missing_from("/api/graph/path?to=db")]
#[case::missing_to("/api/graph/path?from=web")]
#[case::empty_from("/api/graph/path?from=&to=db")]
#[case::bad_depth("/api/components/api/dependencies?depth=deep")]
#[case::negative_hops("/api/components/api/neighbourhood?hops=-2")]
#[case::unknown_version("/api/graph/components-by-status?version=v9")]
#[case::unknown_version_ready("/api/graph/next-implementable?version=beta")]
#[tokio::test]
async fn test_malformed_parameters_are_400(#[case] uri: &str) {
    let (status, body) = get(app_state(fixture()).await, uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}
