//! Features.
//!
//! Features are entitlements. A feature is granted to a tenant, a user or a
//! pricing tier through a `member` warrant on the feature object.

use serde::{Deserialize, Serialize};

use crate::authz::check::MEMBER;
use crate::authz::query::Query;
use crate::resources::list::ListRequest;
use crate::resources::objects::ObjectsClient;
use crate::resources::projection::{Resource, TypedObjects, expect_type};
use crate::resources::warrants::WarrantsClient;
use crate::types::{Meta, Object, ObjectRef, RequestOptions, Subject, Warrant, WarrantToken};
use crate::{Client, Error};

/// A feature, stored as an object of type `feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// The feature id.
    pub feature_id: String,
    /// Metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Server-side creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Resource for Feature {
    const OBJECT_TYPE: &'static str = "feature";

    fn from_object(object: Object) -> Result<Self, Error> {
        expect_type(&object, Self::OBJECT_TYPE)?;
        Ok(Self {
            feature_id: object.object_id,
            meta: object.meta,
            created_at: object.created_at,
        })
    }
}

/// Parameters for creating a feature.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct CreateFeatureParams {
    /// The feature id.
    #[builder(into)]
    pub feature_id: String,
    /// Metadata.
    pub meta: Option<Meta>,
}

impl CreateFeatureParams {
    fn into_parts(self) -> (Option<String>, Option<Meta>) {
        (Some(self.feature_id), self.meta)
    }
}

// Grantee kinds a feature can be assigned to.
const TENANT: &str = "tenant";
const USER: &str = "user";
const PRICING_TIER: &str = "pricing-tier";

/// Client for features.
///
/// Access via `client.features()`.
#[derive(Clone)]
pub struct FeaturesClient {
    objects: TypedObjects<Feature>,
    warrants: WarrantsClient,
}

impl FeaturesClient {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            objects: TypedObjects::new(ObjectsClient::new(client.clone())),
            warrants: WarrantsClient::new(client),
        }
    }

    /// Creates a feature.
    pub async fn create(&self, params: CreateFeatureParams) -> Result<Feature, Error> {
        let (id, meta) = params.into_parts();
        self.objects.create(id, meta).await
    }

    /// Creates several features in one request.
    pub async fn batch_create(
        &self,
        params: Vec<CreateFeatureParams>,
    ) -> Result<Vec<Feature>, Error> {
        let items = params
            .into_iter()
            .map(CreateFeatureParams::into_parts)
            .collect();
        self.objects.batch_create(items).await
    }

    /// Fetches a feature.
    pub async fn get(&self, feature_id: &str, options: &RequestOptions) -> Result<Feature, Error> {
        self.objects.get(feature_id, options).await
    }

    /// Replaces a feature's metadata.
    pub async fn update(&self, feature_id: &str, meta: Option<Meta>) -> Result<Feature, Error> {
        self.objects.update(feature_id, meta).await
    }

    /// Deletes a feature.
    pub async fn delete(&self, feature_id: &str) -> Result<Option<WarrantToken>, Error> {
        self.objects.delete(feature_id).await
    }

    /// Lists features.
    pub fn list(&self) -> ListRequest<Feature> {
        self.objects.list()
    }

    async fn assign(&self, feature_id: &str, grantee: Subject) -> Result<Warrant, Error> {
        self.warrants
            .relate(ObjectRef::new(Feature::OBJECT_TYPE, feature_id), MEMBER, grantee)
            .await
    }

    async fn remove(&self, feature_id: &str, grantee: Subject) -> Result<Option<WarrantToken>, Error> {
        self.warrants
            .unrelate(ObjectRef::new(Feature::OBJECT_TYPE, feature_id), MEMBER, grantee)
            .await
    }

    fn list_for(&self, grantee: ObjectRef) -> ListRequest<Feature> {
        self.objects
            .list_query(Query::select_objects(Feature::OBJECT_TYPE, grantee))
    }

    /// Grants a feature to a tenant.
    pub async fn assign_feature_to_tenant(
        &self,
        feature_id: &str,
        tenant_id: &str,
    ) -> Result<Warrant, Error> {
        self.assign(feature_id, Subject::new(TENANT, tenant_id)).await
    }

    /// Revokes a feature from a tenant.
    pub async fn remove_feature_from_tenant(
        &self,
        feature_id: &str,
        tenant_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.remove(feature_id, Subject::new(TENANT, tenant_id)).await
    }

    /// Lists the features granted to a tenant.
    pub fn list_for_tenant(&self, tenant_id: impl Into<String>) -> ListRequest<Feature> {
        self.list_for(ObjectRef::new(TENANT, tenant_id))
    }

    /// Grants a feature to a user.
    pub async fn assign_feature_to_user(
        &self,
        feature_id: &str,
        user_id: &str,
    ) -> Result<Warrant, Error> {
        self.assign(feature_id, Subject::new(USER, user_id)).await
    }

    /// Revokes a feature from a user.
    pub async fn remove_feature_from_user(
        &self,
        feature_id: &str,
        user_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.remove(feature_id, Subject::new(USER, user_id)).await
    }

    /// Lists the features a user has.
    pub fn list_for_user(&self, user_id: impl Into<String>) -> ListRequest<Feature> {
        self.list_for(ObjectRef::new(USER, user_id))
    }

    /// Includes a feature in a pricing tier.
    pub async fn assign_feature_to_pricing_tier(
        &self,
        feature_id: &str,
        pricing_tier_id: &str,
    ) -> Result<Warrant, Error> {
        self.assign(feature_id, Subject::new(PRICING_TIER, pricing_tier_id))
            .await
    }

    /// Removes a feature from a pricing tier.
    pub async fn remove_feature_from_pricing_tier(
        &self,
        feature_id: &str,
        pricing_tier_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.remove(feature_id, Subject::new(PRICING_TIER, pricing_tier_id))
            .await
    }

    /// Lists the features included in a pricing tier.
    pub fn list_for_pricing_tier(&self, pricing_tier_id: impl Into<String>) -> ListRequest<Feature> {
        self.list_for(ObjectRef::new(PRICING_TIER, pricing_tier_id))
    }
}

impl std::fmt::Debug for FeaturesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturesClient").finish_non_exhaustive()
    }
}
