//! Route gating with a real client against the fake service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::routing::get;
use http::{Request, StatusCode};
use tower::ServiceExt;
use warrant::middleware::{EnsureHasPermission, EnsureIsAuthorized};
use warrant::resources::WarrantParams;
use warrant::{Client, ErrorKind, Subject};

use crate::common::TestFixture;

fn user_header(req: &Request<Body>) -> Option<String> {
    req.headers().get("x-user-id")?.to_str().ok().map(str::to_owned)
}

fn last_segment(req: &Request<Body>) -> Option<String> {
    req.uri().path().rsplit('/').next().map(str::to_owned)
}

fn app(client: Client, hits: Arc<AtomicUsize>) -> Router {
    let reports = EnsureIsAuthorized::new("report", "viewer")
        .object_id_from(last_segment)
        .user_id_from(user_header)
        .layer(client.clone())
        .expect("gate should build");
    let billing = EnsureHasPermission::new("manage-billing")
        .user_id_from(user_header)
        .layer(client)
        .expect("gate should build");

    let report_hits = hits.clone();
    Router::new()
        .route(
            "/reports/{id}",
            get(move || {
                let hits = report_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "report"
                }
            })
            .route_layer(reports),
        )
        .route(
            "/billing",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "billing"
                }
            })
            .route_layer(billing),
        )
}

fn get_as(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .expect("request should build")
}

#[tokio::test]
async fn test_gate_allows_and_denies() {
    let fixture = TestFixture::start().await;
    fixture
        .client
        .warrants()
        .create(
            WarrantParams::builder()
                .object_type("report")
                .object_id("q3")
                .relation("viewer")
                .subject(Subject::new("user", "alice"))
                .build(),
        )
        .await
        .expect("create warrant should succeed");

    let hits = Arc::new(AtomicUsize::new(0));
    let app = app(fixture.client.clone(), hits.clone());

    let allowed = app
        .clone()
        .oneshot(get_as("/reports/q3", "alice"))
        .await
        .expect("router is infallible");
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let denied = app
        .clone()
        .oneshot(get_as("/reports/q3", "bob"))
        .await
        .expect("router is infallible");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let other_report = app
        .oneshot(get_as("/reports/q4", "alice"))
        .await
        .expect("router is infallible");
    assert_eq!(other_report.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_permission_gate() {
    let fixture = TestFixture::start().await;
    fixture
        .client
        .permissions()
        .assign_permission_to_user("manage-billing", "carol")
        .await
        .expect("assign should succeed");

    let hits = Arc::new(AtomicUsize::new(0));
    let app = app(fixture.client.clone(), hits.clone());

    let response = app
        .clone()
        .oneshot(get_as("/billing", "carol"))
        .await
        .expect("router is infallible");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_as("/billing", "dave"))
        .await
        .expect("router is infallible");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_service_failure_never_reaches_handler() {
    let fixture = TestFixture::start().await;
    let uri = fixture.server.uri();
    drop(fixture);

    let client = Client::builder()
        .api_key("integration_key")
        .api_endpoint(&uri)
        .authorize_endpoint(&uri)
        .build()
        .expect("client should build");

    let hits = Arc::new(AtomicUsize::new(0));
    let response = app(client, hits.clone())
        .oneshot(get_as("/reports/q3", "alice"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_id_source_is_configuration_error() {
    let client = Client::builder()
        .api_key("integration_key")
        .build()
        .expect("client should build");

    let err = EnsureIsAuthorized::new("report", "viewer")
        .user_id_from(user_header)
        .layer(client)
        .expect_err("object id source is required");
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
