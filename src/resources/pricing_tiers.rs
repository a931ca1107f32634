//! Pricing tiers.

use serde::{Deserialize, Serialize};

use crate::authz::check::MEMBER;
use crate::authz::query::Query;
use crate::resources::list::ListRequest;
use crate::resources::objects::ObjectsClient;
use crate::resources::projection::{Resource, TypedObjects, expect_type};
use crate::resources::warrants::WarrantsClient;
use crate::types::{Meta, Object, ObjectRef, RequestOptions, Subject, Warrant, WarrantToken};
use crate::{Client, Error};

/// A pricing tier, stored as an object of type `pricing-tier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    /// The pricing tier id.
    pub pricing_tier_id: String,
    /// Metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Server-side creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Resource for PricingTier {
    const OBJECT_TYPE: &'static str = "pricing-tier";

    fn from_object(object: Object) -> Result<Self, Error> {
        expect_type(&object, Self::OBJECT_TYPE)?;
        Ok(Self {
            pricing_tier_id: object.object_id,
            meta: object.meta,
            created_at: object.created_at,
        })
    }
}

/// Parameters for creating a pricing tier.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct CreatePricingTierParams {
    /// The pricing tier id.
    #[builder(into)]
    pub pricing_tier_id: String,
    /// Metadata.
    pub meta: Option<Meta>,
}

/// Client for pricing tiers.
///
/// Access via `client.pricing_tiers()`.
#[derive(Clone)]
pub struct PricingTiersClient {
    objects: TypedObjects<PricingTier>,
    warrants: WarrantsClient,
}

impl PricingTiersClient {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            objects: TypedObjects::new(ObjectsClient::new(client.clone())),
            warrants: WarrantsClient::new(client),
        }
    }

    /// Creates a pricing tier.
    pub async fn create(&self, params: CreatePricingTierParams) -> Result<PricingTier, Error> {
        self.objects
            .create(Some(params.pricing_tier_id), params.meta)
            .await
    }

    /// Creates several pricing tiers in one request.
    pub async fn batch_create(
        &self,
        params: Vec<CreatePricingTierParams>,
    ) -> Result<Vec<PricingTier>, Error> {
        let items = params
            .into_iter()
            .map(|p| (Some(p.pricing_tier_id), p.meta))
            .collect();
        self.objects.batch_create(items).await
    }

    /// Fetches a pricing tier.
    pub async fn get(
        &self,
        pricing_tier_id: &str,
        options: &RequestOptions,
    ) -> Result<PricingTier, Error> {
        self.objects.get(pricing_tier_id, options).await
    }

    /// Replaces a pricing tier's metadata.
    pub async fn update(
        &self,
        pricing_tier_id: &str,
        meta: Option<Meta>,
    ) -> Result<PricingTier, Error> {
        self.objects.update(pricing_tier_id, meta).await
    }

    /// Deletes a pricing tier.
    pub async fn delete(&self, pricing_tier_id: &str) -> Result<Option<WarrantToken>, Error> {
        self.objects.delete(pricing_tier_id).await
    }

    /// Lists pricing tiers.
    pub fn list(&self) -> ListRequest<PricingTier> {
        self.objects.list()
    }

    /// Puts a tenant on a pricing tier.
    pub async fn assign_pricing_tier_to_tenant(
        &self,
        pricing_tier_id: &str,
        tenant_id: &str,
    ) -> Result<Warrant, Error> {
        self.warrants
            .relate(
                ObjectRef::new(PricingTier::OBJECT_TYPE, pricing_tier_id),
                MEMBER,
                Subject::new("tenant", tenant_id),
            )
            .await
    }

    /// Takes a tenant off a pricing tier.
    pub async fn remove_pricing_tier_from_tenant(
        &self,
        pricing_tier_id: &str,
        tenant_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.warrants
            .unrelate(
                ObjectRef::new(PricingTier::OBJECT_TYPE, pricing_tier_id),
                MEMBER,
                Subject::new("tenant", tenant_id),
            )
            .await
    }

    /// Lists the pricing tiers of a tenant.
    pub fn list_for_tenant(&self, tenant_id: impl Into<String>) -> ListRequest<PricingTier> {
        self.objects.list_query(Query::select_objects(
            PricingTier::OBJECT_TYPE,
            ObjectRef::new("tenant", tenant_id),
        ))
    }

    /// Puts a user on a pricing tier.
    pub async fn assign_pricing_tier_to_user(
        &self,
        pricing_tier_id: &str,
        user_id: &str,
    ) -> Result<Warrant, Error> {
        self.warrants
            .relate(
                ObjectRef::new(PricingTier::OBJECT_TYPE, pricing_tier_id),
                MEMBER,
                Subject::new("user", user_id),
            )
            .await
    }

    /// Takes a user off a pricing tier.
    pub async fn remove_pricing_tier_from_user(
        &self,
        pricing_tier_id: &str,
        user_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.warrants
            .unrelate(
                ObjectRef::new(PricingTier::OBJECT_TYPE, pricing_tier_id),
                MEMBER,
                Subject::new("user", user_id),
            )
            .await
    }

    /// Lists the pricing tiers of a user.
    pub fn list_for_user(&self, user_id: impl Into<String>) -> ListRequest<PricingTier> {
        self.objects.list_query(Query::select_objects(
            PricingTier::OBJECT_TYPE,
            ObjectRef::new("user", user_id),
        ))
    }
}

impl std::fmt::Debug for PricingTiersClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingTiersClient").finish_non_exhaustive()
    }
}
