//! Tenants.

use serde::{Deserialize, Serialize};

use crate::authz::query::Query;
use crate::resources::list::ListRequest;
use crate::resources::objects::ObjectsClient;
use crate::resources::projection::{Resource, TypedObjects, expect_type, take_string, with_fields};
use crate::resources::warrants::WarrantsClient;
use crate::types::{Meta, Object, ObjectRef, RequestOptions, Subject, Warrant, WarrantToken};
use crate::{Client, Error};

/// A tenant, stored as an object of type `tenant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// The tenant id.
    pub tenant_id: String,
    /// Display name, stored in metadata under `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Server-side creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Resource for Tenant {
    const OBJECT_TYPE: &'static str = "tenant";

    fn from_object(object: Object) -> Result<Self, Error> {
        expect_type(&object, Self::OBJECT_TYPE)?;
        let mut meta = object.meta;
        Ok(Self {
            tenant_id: object.object_id,
            name: take_string(&mut meta, "name"),
            meta,
            created_at: object.created_at,
        })
    }
}

/// Parameters for creating a tenant.
#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct CreateTenantParams {
    /// The tenant id; assigned by the service when absent.
    #[builder(into)]
    pub tenant_id: Option<String>,
    /// Display name.
    #[builder(into)]
    pub name: Option<String>,
    /// Additional metadata.
    pub meta: Option<Meta>,
}

impl CreateTenantParams {
    fn into_parts(self) -> (Option<String>, Option<Meta>) {
        let meta = with_fields(self.meta, &[("name", self.name.as_ref())]);
        (self.tenant_id, meta)
    }
}

/// Parameters for updating a tenant.
#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct UpdateTenantParams {
    /// Display name.
    #[builder(into)]
    pub name: Option<String>,
    /// Additional metadata.
    pub meta: Option<Meta>,
}

/// Client for tenants.
///
/// Access via `client.tenants()`.
#[derive(Clone)]
pub struct TenantsClient {
    objects: TypedObjects<Tenant>,
    warrants: WarrantsClient,
}

impl TenantsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            objects: TypedObjects::new(ObjectsClient::new(client.clone())),
            warrants: WarrantsClient::new(client),
        }
    }

    /// Creates a tenant.
    pub async fn create(&self, params: CreateTenantParams) -> Result<Tenant, Error> {
        let (id, meta) = params.into_parts();
        self.objects.create(id, meta).await
    }

    /// Creates several tenants in one request.
    pub async fn batch_create(&self, params: Vec<CreateTenantParams>) -> Result<Vec<Tenant>, Error> {
        let items = params.into_iter().map(CreateTenantParams::into_parts).collect();
        self.objects.batch_create(items).await
    }

    /// Fetches a tenant.
    pub async fn get(&self, tenant_id: &str, options: &RequestOptions) -> Result<Tenant, Error> {
        self.objects.get(tenant_id, options).await
    }

    /// Updates a tenant.
    pub async fn update(&self, tenant_id: &str, params: UpdateTenantParams) -> Result<Tenant, Error> {
        let meta = with_fields(params.meta, &[("name", params.name.as_ref())]);
        self.objects.update(tenant_id, meta).await
    }

    /// Deletes a tenant.
    pub async fn delete(&self, tenant_id: &str) -> Result<Option<WarrantToken>, Error> {
        self.objects.delete(tenant_id).await
    }

    /// Lists tenants.
    pub fn list(&self) -> ListRequest<Tenant> {
        self.objects.list()
    }

    /// Gives a user `relation` on a tenant (e.g. `"member"` or `"admin"`).
    pub async fn assign_user_to_tenant(
        &self,
        tenant_id: &str,
        user_id: &str,
        relation: &str,
    ) -> Result<Warrant, Error> {
        self.warrants
            .relate(
                ObjectRef::new(Tenant::OBJECT_TYPE, tenant_id),
                relation,
                Subject::new("user", user_id),
            )
            .await
    }

    /// Removes a user's `relation` on a tenant.
    pub async fn remove_user_from_tenant(
        &self,
        tenant_id: &str,
        user_id: &str,
        relation: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.warrants
            .unrelate(
                ObjectRef::new(Tenant::OBJECT_TYPE, tenant_id),
                relation,
                Subject::new("user", user_id),
            )
            .await
    }

    /// Lists the tenants a user holds any relation on.
    pub fn list_for_user(&self, user_id: impl Into<String>) -> ListRequest<Tenant> {
        self.objects.list_query(Query::select_objects(
            Tenant::OBJECT_TYPE,
            ObjectRef::new("user", user_id),
        ))
    }
}

impl std::fmt::Debug for TenantsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantsClient").finish_non_exhaustive()
    }
}
