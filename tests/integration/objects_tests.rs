//! Object and typed-resource CRUD against the fake service.

use serde_json::json;
use warrant::resources::{
    CreateObjectParams, CreateRoleParams, CreateTenantParams, CreateUserParams, ObjectType,
    RelationRule, UpdateUserParams,
};
use warrant::{ErrorKind, Meta, ObjectRef, RequestOptions};

use crate::common::TestFixture;

fn meta(value: serde_json::Value) -> Meta {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Meta::new(),
    }
}

#[tokio::test]
async fn test_create_then_get_returns_same_object() {
    let fixture = TestFixture::start().await;
    let objects = fixture.client.objects();

    let created = objects
        .create(
            CreateObjectParams::builder()
                .object_type("document")
                .object_id("readme")
                .meta(meta(json!({"title": "Read me"})))
                .build(),
        )
        .await
        .expect("create should succeed");
    let fetched = objects
        .get("document", "readme", &RequestOptions::latest())
        .await
        .expect("get should succeed");

    assert_eq!(created, fetched);
    assert_eq!(fetched.meta_str("title"), Some("Read me"));
}

#[tokio::test]
async fn test_server_assigns_missing_id() {
    let fixture = TestFixture::start().await;

    let user = fixture
        .client
        .users()
        .create(CreateUserParams::builder().email("anon@example.com").build())
        .await
        .expect("create should succeed");

    assert!(user.user_id.starts_with("gen_"));
    assert_eq!(user.email.as_deref(), Some("anon@example.com"));
    assert!(user.created_at.is_some());
}

#[tokio::test]
async fn test_delete_then_list_excludes_object() {
    let fixture = TestFixture::start().await;
    let tenants = fixture.client.tenants();

    for id in ["acme", "globex", "initech"] {
        tenants
            .create(CreateTenantParams::builder().tenant_id(id).build())
            .await
            .expect("create should succeed");
    }

    let token = tenants.delete("globex").await.expect("delete should succeed");
    let page = tenants
        .list()
        .warrant_token(token.expect("delete returns a token"))
        .await
        .expect("list should succeed");

    let ids: Vec<_> = page.results.iter().map(|t| t.tenant_id.as_str()).collect();
    assert_eq!(ids, ["acme", "initech"]);
}

#[tokio::test]
async fn test_get_after_delete_is_not_found() {
    let fixture = TestFixture::start().await;
    let roles = fixture.client.roles();

    roles
        .create(CreateRoleParams::builder().role_id("admin").build())
        .await
        .expect("create should succeed");
    roles.delete("admin").await.expect("delete should succeed");

    let err = roles
        .get("admin", &RequestOptions::latest())
        .await
        .expect_err("role is gone");
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(404));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let fixture = TestFixture::start().await;
    let users = fixture.client.users();
    let params = CreateUserParams::builder().user_id("alice").build();

    users.create(params.clone()).await.expect("first create succeeds");
    let err = users.create(params).await.expect_err("second create conflicts");

    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_update_replaces_typed_fields() {
    let fixture = TestFixture::start().await;
    let users = fixture.client.users();

    users
        .create(
            CreateUserParams::builder()
                .user_id("alice")
                .email("old@example.com")
                .meta(meta(json!({"plan": "free"})))
                .build(),
        )
        .await
        .expect("create should succeed");

    let updated = users
        .update("alice", UpdateUserParams::builder().email("new@example.com").build())
        .await
        .expect("update should succeed");

    assert_eq!(updated.email.as_deref(), Some("new@example.com"));
    assert!(updated.meta.is_none(), "update replaces metadata");
}

#[tokio::test]
async fn test_batch_create_and_batch_delete() {
    let fixture = TestFixture::start().await;
    let objects = fixture.client.objects();

    let created = objects
        .batch_create(vec![
            CreateObjectParams::builder().object_type("folder").object_id("a").build(),
            CreateObjectParams::builder().object_type("folder").object_id("b").build(),
        ])
        .await
        .expect("batch create should succeed");
    assert_eq!(created.len(), 2);
    assert_eq!(created[1].object_id, "b");

    objects
        .batch_delete(vec![ObjectRef::new("folder", "a"), ObjectRef::new("folder", "b")])
        .await
        .expect("batch delete should succeed");

    let page = objects
        .list()
        .object_type("folder")
        .latest()
        .await
        .expect("list should succeed");
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_pagination_passes_cursors_through() {
    let fixture = TestFixture::start().await;
    let users = fixture.client.users();

    let params = (1..=5)
        .map(|i| CreateUserParams::builder().user_id(format!("u{}", i)).build())
        .collect();
    users.batch_create(params).await.expect("batch create should succeed");

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let mut request = users.list().limit(2);
        if let Some(c) = cursor.take() {
            request = request.next_cursor(c);
        }
        let page = request.await.expect("list should succeed");
        seen.extend(page.results.iter().map(|u| u.user_id.clone()));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(seen, ["u1", "u2", "u3", "u4", "u5"]);
}

#[tokio::test]
async fn test_empty_id_rejected_before_request() {
    let fixture = TestFixture::start().await;

    let err = fixture
        .client
        .objects()
        .get("document", "", &RequestOptions::default())
        .await
        .expect_err("empty id is invalid");

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let requests = fixture.server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_wrong_api_key_is_unauthorized() {
    let fixture = TestFixture::start().await;
    let client = warrant::Client::builder()
        .api_key("wrong")
        .api_endpoint(fixture.server.uri())
        .build()
        .expect("client should build");

    let err = client.users().list().await.expect_err("bad key is rejected");
    assert!(err.is_unauthorized());
}

#[test]
fn test_object_type_definition_shape() {
    let document = ObjectType::new("document")
        .relation("owner", RelationRule::direct())
        .relation("viewer", RelationRule::inherit_if("owner"));
    assert_eq!(document.relations["viewer"].inherit_if.as_deref(), Some("owner"));
}
