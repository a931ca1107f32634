//! Authorization checks, queries and error statuses.

use test_case::test_case;
use warrant::resources::{
    AuthorizationSessionParams, SelfServiceSessionParams, SelfServiceStrategy, WarrantParams,
};
use warrant::{CheckOp, ErrorKind, PolicyContext, Query, Subject, WarrantCheck};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestFixture, client_for};

fn viewer(user: &str) -> WarrantCheck {
    WarrantCheck::new("report", "q3", "viewer", Subject::new("user", user))
}

async fn grant_viewer(fixture: &TestFixture, user: &str, policy: Option<&str>) {
    let params = WarrantParams::builder()
        .object_type("report")
        .object_id("q3")
        .relation("viewer")
        .subject(Subject::new("user", user))
        .maybe_policy(policy.map(str::to_owned))
        .build();
    fixture
        .client
        .warrants()
        .create(params)
        .await
        .expect("create warrant should succeed");
}

#[tokio::test]
async fn test_check_after_write_and_delete() {
    let fixture = TestFixture::start().await;
    let client = &fixture.client;

    assert!(!client.check(viewer("alice")).await.expect("check should succeed"));

    grant_viewer(&fixture, "alice", None).await;
    assert!(client.check(viewer("alice")).latest().await.expect("check should succeed"));
    assert!(!client.check(viewer("bob")).latest().await.expect("check should succeed"));

    client
        .warrants()
        .delete(WarrantParams::from(viewer_warrant("alice")))
        .await
        .expect("delete should succeed");
    assert!(!client.check(viewer("alice")).latest().await.expect("check should succeed"));
}

fn viewer_warrant(user: &str) -> warrant::Warrant {
    warrant::Warrant::new("report", "q3", "viewer", Subject::new("user", user))
}

#[tokio::test]
async fn test_write_token_feeds_check() {
    let fixture = TestFixture::start().await;

    let warrant = fixture
        .client
        .warrants()
        .create(WarrantParams::from(viewer_warrant("alice")))
        .await
        .expect("create should succeed");
    let token = warrant.warrant_token.expect("write returns a token");
    assert!(token.value().starts_with("wt_"));

    let allowed = fixture
        .client
        .check(viewer("alice"))
        .warrant_token(token)
        .await
        .expect("check should succeed");
    assert!(allowed);
}

#[test_case("us", true ; "matching context")]
#[test_case("eu", false ; "other context")]
#[tokio::test]
async fn test_policy_context(geo: &str, expected: bool) {
    let fixture = TestFixture::start().await;
    grant_viewer(&fixture, "alice", Some(r#"geo == "us""#)).await;

    let allowed = fixture
        .client
        .check(viewer("alice"))
        .context(PolicyContext::new().with("geo", geo))
        .await
        .expect("check should succeed");
    assert_eq!(allowed, expected);
}

#[tokio::test]
async fn test_policy_survives_refetch() {
    const POLICY: &str = r#"geo == "us""#;
    let fixture = TestFixture::start().await;
    grant_viewer(&fixture, "alice", Some(POLICY)).await;

    let decide = |check: WarrantCheck, geo: &'static str| {
        let client = fixture.client.clone();
        async move {
            client
                .check(check)
                .context(PolicyContext::new().with("geo", geo))
                .latest()
                .await
                .expect("check should succeed")
        }
    };

    assert!(decide(viewer("alice"), "us").await);
    assert!(!decide(viewer("alice"), "eu").await);

    let page = fixture
        .client
        .warrants()
        .list()
        .object_type("report")
        .object_id("q3")
        .latest()
        .await
        .expect("list should succeed");
    assert_eq!(page.len(), 1);
    let fetched = &page.results[0];
    assert_eq!(fetched.policy.as_deref(), Some(POLICY));
    assert_eq!(
        fetched.to_string(),
        r#"report:q3#viewer@user:alice[geo == "us"]"#
    );

    assert!(decide(WarrantCheck::from(fetched), "us").await);
    assert!(!decide(WarrantCheck::from(fetched), "eu").await);
}

#[tokio::test]
async fn test_policy_without_context_denies() {
    let fixture = TestFixture::start().await;
    grant_viewer(&fixture, "alice", Some(r#"geo == "us""#)).await;

    let allowed = fixture
        .client
        .check(viewer("alice"))
        .await
        .expect("check should succeed");
    assert!(!allowed);
}

#[test_case(CheckOp::AnyOf, true ; "any of")]
#[test_case(CheckOp::AllOf, false ; "all of")]
#[tokio::test]
async fn test_check_many(op: CheckOp, expected: bool) {
    let fixture = TestFixture::start().await;
    grant_viewer(&fixture, "alice", None).await;

    let allowed = fixture
        .client
        .check_many(op, vec![viewer("alice"), viewer("bob")])
        .await
        .expect("check should succeed");
    assert_eq!(allowed, expected);
}

#[tokio::test]
async fn test_rbac_helpers() {
    let fixture = TestFixture::start().await;
    let client = &fixture.client;

    client
        .roles()
        .assign_role_to_user("admin", "alice")
        .await
        .expect("assign should succeed");
    client
        .permissions()
        .assign_permission_to_user("export", "alice")
        .await
        .expect("assign should succeed");
    client
        .features()
        .assign_feature_to_tenant("sso", "acme")
        .await
        .expect("assign should succeed");

    assert!(client.check_user_has_role("alice", "admin").await.expect("check"));
    assert!(!client.check_user_has_role("bob", "admin").await.expect("check"));
    assert!(client.check_user_has_permission("alice", "export").await.expect("check"));
    assert!(
        client
            .check_has_feature(Subject::new("tenant", "acme"), "sso")
            .await
            .expect("check")
    );
    assert!(
        !client
            .check_has_feature(Subject::new("tenant", "globex"), "sso")
            .await
            .expect("check")
    );
}

#[tokio::test]
async fn test_query_returns_warrant_rows() {
    let fixture = TestFixture::start().await;
    grant_viewer(&fixture, "alice", None).await;

    let page = fixture
        .client
        .query(Query::select_objects("report", warrant::ObjectRef::new("user", "alice")).relation("viewer"))
        .latest()
        .await
        .expect("query should succeed");

    assert_eq!(page.len(), 1);
    let row = &page.results[0];
    assert_eq!(row.object_id, "q3");
    assert_eq!(
        row.warrant.as_ref().map(ToString::to_string).as_deref(),
        Some("report:q3#viewer@user:alice")
    );
}

#[tokio::test]
async fn test_sessions() {
    let fixture = TestFixture::start().await;
    let sessions = fixture.client.sessions();

    let token = sessions
        .create_authorization_session(
            AuthorizationSessionParams::builder()
                .user_id("alice")
                .tenant_id("acme")
                .build(),
        )
        .await
        .expect("session should be created");
    assert!(token.starts_with("sess_"));

    let url = sessions
        .create_self_service_session(
            SelfServiceSessionParams::builder()
                .user_id("alice")
                .tenant_id("acme")
                .redirect_url("https://app.test/done")
                .strategy(SelfServiceStrategy::Fgac)
                .build(),
        )
        .await
        .expect("session should be created");
    assert_eq!(url.host_str(), Some("dash.test"));
    assert_eq!(
        url.query(),
        Some("redirectUrl=https%3A%2F%2Fapp.test%2Fdone")
    );
}

#[test_case(400 ; "bad request")]
#[test_case(401 ; "unauthorized")]
#[test_case(403 ; "forbidden")]
#[test_case(404 ; "not found")]
#[test_case(429 ; "rate limited")]
#[test_case(500 ; "server error")]
#[test_case(503 ; "unavailable")]
#[tokio::test]
async fn test_error_status_surfaces_on_every_path(status: u16) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/authorize"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/objects/user/alice"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.check(viewer("alice")).await.expect_err("check fails");
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(status));
    assert_eq!(err.body(), Some("upstream says no"));

    let err = client
        .users()
        .get("alice", &Default::default())
        .await
        .expect_err("get fails");
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(status));
}
