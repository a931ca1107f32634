//! Assign / list / remove round trips for every resource pairing.

use test_case::test_case;
use warrant::resources::WarrantParams;
use warrant::{Client, Subject};

use crate::common::TestFixture;

#[derive(Debug, Clone, Copy)]
enum Pair {
    RoleUser,
    PermissionRole,
    PermissionUser,
    FeatureTenant,
    FeatureUser,
    FeaturePricingTier,
    PricingTierTenant,
    PricingTierUser,
    TenantUser,
}

async fn assign(client: &Client, pair: Pair, target: &str, holder: &str) -> warrant::Result<()> {
    match pair {
        Pair::RoleUser => client.roles().assign_role_to_user(target, holder).await?,
        Pair::PermissionRole => {
            client
                .permissions()
                .assign_permission_to_role(target, holder)
                .await?
        }
        Pair::PermissionUser => {
            client
                .permissions()
                .assign_permission_to_user(target, holder)
                .await?
        }
        Pair::FeatureTenant => client.features().assign_feature_to_tenant(target, holder).await?,
        Pair::FeatureUser => client.features().assign_feature_to_user(target, holder).await?,
        Pair::FeaturePricingTier => {
            client
                .features()
                .assign_feature_to_pricing_tier(target, holder)
                .await?
        }
        Pair::PricingTierTenant => {
            client
                .pricing_tiers()
                .assign_pricing_tier_to_tenant(target, holder)
                .await?
        }
        Pair::PricingTierUser => {
            client
                .pricing_tiers()
                .assign_pricing_tier_to_user(target, holder)
                .await?
        }
        Pair::TenantUser => {
            client
                .tenants()
                .assign_user_to_tenant(target, holder, "member")
                .await?
        }
    };
    Ok(())
}

async fn remove(client: &Client, pair: Pair, target: &str, holder: &str) -> warrant::Result<()> {
    match pair {
        Pair::RoleUser => client.roles().remove_role_from_user(target, holder).await?,
        Pair::PermissionRole => {
            client
                .permissions()
                .remove_permission_from_role(target, holder)
                .await?
        }
        Pair::PermissionUser => {
            client
                .permissions()
                .remove_permission_from_user(target, holder)
                .await?
        }
        Pair::FeatureTenant => client.features().remove_feature_from_tenant(target, holder).await?,
        Pair::FeatureUser => client.features().remove_feature_from_user(target, holder).await?,
        Pair::FeaturePricingTier => {
            client
                .features()
                .remove_feature_from_pricing_tier(target, holder)
                .await?
        }
        Pair::PricingTierTenant => {
            client
                .pricing_tiers()
                .remove_pricing_tier_from_tenant(target, holder)
                .await?
        }
        Pair::PricingTierUser => {
            client
                .pricing_tiers()
                .remove_pricing_tier_from_user(target, holder)
                .await?
        }
        Pair::TenantUser => {
            client
                .tenants()
                .remove_user_from_tenant(target, holder, "member")
                .await?
        }
    };
    Ok(())
}

/// Ids of the `target`-side resources listed for `holder`.
async fn listed(client: &Client, pair: Pair, holder: &str) -> warrant::Result<Vec<String>> {
    let ids = match pair {
        Pair::RoleUser => ids(client.roles().list_for_user(holder).latest().await?.results, |r| r.role_id),
        Pair::PermissionRole => ids(
            client.permissions().list_for_role(holder).latest().await?.results,
            |p| p.permission_id,
        ),
        Pair::PermissionUser => ids(
            client.permissions().list_for_user(holder).latest().await?.results,
            |p| p.permission_id,
        ),
        Pair::FeatureTenant => ids(
            client.features().list_for_tenant(holder).latest().await?.results,
            |f| f.feature_id,
        ),
        Pair::FeatureUser => ids(
            client.features().list_for_user(holder).latest().await?.results,
            |f| f.feature_id,
        ),
        Pair::FeaturePricingTier => ids(
            client.features().list_for_pricing_tier(holder).latest().await?.results,
            |f| f.feature_id,
        ),
        Pair::PricingTierTenant => ids(
            client.pricing_tiers().list_for_tenant(holder).latest().await?.results,
            |t| t.pricing_tier_id,
        ),
        Pair::PricingTierUser => ids(
            client.pricing_tiers().list_for_user(holder).latest().await?.results,
            |t| t.pricing_tier_id,
        ),
        Pair::TenantUser => ids(
            client.tenants().list_for_user(holder).latest().await?.results,
            |t| t.tenant_id,
        ),
    };
    Ok(ids)
}

fn ids<T>(rows: Vec<T>, id: impl Fn(T) -> String) -> Vec<String> {
    rows.into_iter().map(id).collect()
}

#[test_case(Pair::RoleUser ; "role to user")]
#[test_case(Pair::PermissionRole ; "permission to role")]
#[test_case(Pair::PermissionUser ; "permission to user")]
#[test_case(Pair::FeatureTenant ; "feature to tenant")]
#[test_case(Pair::FeatureUser ; "feature to user")]
#[test_case(Pair::FeaturePricingTier ; "feature to pricing tier")]
#[test_case(Pair::PricingTierTenant ; "pricing tier to tenant")]
#[test_case(Pair::PricingTierUser ; "pricing tier to user")]
#[test_case(Pair::TenantUser ; "user to tenant")]
#[tokio::test]
async fn test_assign_list_remove(pair: Pair) {
    let fixture = TestFixture::start().await;
    let client = &fixture.client;

    assign(client, pair, "t1", "h1").await.expect("assign should succeed");
    assign(client, pair, "t2", "h1").await.expect("assign should succeed");
    assign(client, pair, "t3", "h2").await.expect("assign should succeed");

    let mut ids = listed(client, pair, "h1").await.expect("list should succeed");
    ids.sort();
    assert_eq!(ids, ["t1", "t2"]);

    remove(client, pair, "t1", "h1").await.expect("remove should succeed");
    let ids = listed(client, pair, "h1").await.expect("list should succeed");
    assert_eq!(ids, ["t2"]);
    assert_eq!(fixture.fake.warrant_count(), 2);
}

#[tokio::test]
async fn test_users_of_tenant() {
    let fixture = TestFixture::start().await;
    let tenants = fixture.client.tenants();

    tenants
        .assign_user_to_tenant("acme", "alice", "admin")
        .await
        .expect("assign should succeed");
    tenants
        .assign_user_to_tenant("acme", "bob", "member")
        .await
        .expect("assign should succeed");

    let users = fixture
        .client
        .users()
        .list_for_tenant("acme")
        .latest()
        .await
        .expect("list should succeed");
    let ids: Vec<_> = users.results.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(ids, ["alice", "bob"]);
}

#[tokio::test]
async fn test_removing_missing_assignment_surfaces_404() {
    let fixture = TestFixture::start().await;

    let err = fixture
        .client
        .roles()
        .remove_role_from_user("admin", "nobody")
        .await
        .expect_err("nothing to remove");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_warrants_list_filters() {
    let fixture = TestFixture::start().await;
    let warrants = fixture.client.warrants();

    warrants
        .batch_create(vec![
            WarrantParams::builder()
                .object_type("document")
                .object_id("d1")
                .relation("viewer")
                .subject(Subject::new("user", "alice"))
                .build(),
            WarrantParams::builder()
                .object_type("folder")
                .object_id("f1")
                .relation("viewer")
                .subject(Subject::new("user", "alice"))
                .build(),
        ])
        .await
        .expect("batch create should succeed");

    let page = warrants
        .list()
        .object_type("document")
        .latest()
        .await
        .expect("list should succeed");
    assert_eq!(page.len(), 1);
    assert_eq!(page.results[0].to_string(), "document:d1#viewer@user:alice");
}
