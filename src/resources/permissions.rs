//! Permissions.

use serde::{Deserialize, Serialize};

use crate::authz::query::Query;
use crate::resources::list::ListRequest;
use crate::resources::objects::ObjectsClient;
use crate::resources::projection::{Resource, TypedObjects, expect_type, take_string, with_fields};
use crate::resources::warrants::WarrantsClient;
use crate::authz::check::MEMBER;
use crate::types::{Meta, Object, ObjectRef, RequestOptions, Subject, Warrant, WarrantToken};
use crate::{Client, Error};

/// A permission, stored as an object of type `permission`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// The permission id.
    pub permission_id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Server-side creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Resource for Permission {
    const OBJECT_TYPE: &'static str = "permission";

    fn from_object(object: Object) -> Result<Self, Error> {
        expect_type(&object, Self::OBJECT_TYPE)?;
        let mut meta = object.meta;
        Ok(Self {
            permission_id: object.object_id,
            name: take_string(&mut meta, "name"),
            description: take_string(&mut meta, "description"),
            meta,
            created_at: object.created_at,
        })
    }
}

/// Parameters for creating a permission.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct CreatePermissionParams {
    /// The permission id.
    #[builder(into)]
    pub permission_id: String,
    /// Display name.
    #[builder(into)]
    pub name: Option<String>,
    /// Description.
    #[builder(into)]
    pub description: Option<String>,
    /// Additional metadata.
    pub meta: Option<Meta>,
}

impl CreatePermissionParams {
    fn into_parts(self) -> (Option<String>, Option<Meta>) {
        let meta = with_fields(
            self.meta,
            &[
                ("name", self.name.as_ref()),
                ("description", self.description.as_ref()),
            ],
        );
        (Some(self.permission_id), meta)
    }
}

/// Parameters for updating a permission.
#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct UpdatePermissionParams {
    /// Display name.
    #[builder(into)]
    pub name: Option<String>,
    /// Description.
    #[builder(into)]
    pub description: Option<String>,
    /// Additional metadata.
    pub meta: Option<Meta>,
}

/// Client for permissions.
///
/// Access via `client.permissions()`. Permissions are granted to roles or
/// directly to users.
#[derive(Clone)]
pub struct PermissionsClient {
    objects: TypedObjects<Permission>,
    warrants: WarrantsClient,
}

impl PermissionsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            objects: TypedObjects::new(ObjectsClient::new(client.clone())),
            warrants: WarrantsClient::new(client),
        }
    }

    /// Creates a permission.
    pub async fn create(&self, params: CreatePermissionParams) -> Result<Permission, Error> {
        let (id, meta) = params.into_parts();
        self.objects.create(id, meta).await
    }

    /// Creates several permissions in one request.
    pub async fn batch_create(
        &self,
        params: Vec<CreatePermissionParams>,
    ) -> Result<Vec<Permission>, Error> {
        let items = params
            .into_iter()
            .map(CreatePermissionParams::into_parts)
            .collect();
        self.objects.batch_create(items).await
    }

    /// Fetches a permission.
    pub async fn get(
        &self,
        permission_id: &str,
        options: &RequestOptions,
    ) -> Result<Permission, Error> {
        self.objects.get(permission_id, options).await
    }

    /// Updates a permission.
    pub async fn update(
        &self,
        permission_id: &str,
        params: UpdatePermissionParams,
    ) -> Result<Permission, Error> {
        let meta = with_fields(
            params.meta,
            &[
                ("name", params.name.as_ref()),
                ("description", params.description.as_ref()),
            ],
        );
        self.objects.update(permission_id, meta).await
    }

    /// Deletes a permission.
    pub async fn delete(&self, permission_id: &str) -> Result<Option<WarrantToken>, Error> {
        self.objects.delete(permission_id).await
    }

    /// Lists permissions.
    pub fn list(&self) -> ListRequest<Permission> {
        self.objects.list()
    }

    /// Grants a permission to a role.
    pub async fn assign_permission_to_role(
        &self,
        permission_id: &str,
        role_id: &str,
    ) -> Result<Warrant, Error> {
        self.warrants
            .relate(
                ObjectRef::new(Permission::OBJECT_TYPE, permission_id),
                MEMBER,
                Subject::new("role", role_id),
            )
            .await
    }

    /// Revokes a permission from a role.
    pub async fn remove_permission_from_role(
        &self,
        permission_id: &str,
        role_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.warrants
            .unrelate(
                ObjectRef::new(Permission::OBJECT_TYPE, permission_id),
                MEMBER,
                Subject::new("role", role_id),
            )
            .await
    }

    /// Lists the permissions granted to a role.
    pub fn list_for_role(&self, role_id: impl Into<String>) -> ListRequest<Permission> {
        self.objects.list_query(Query::select_objects(
            Permission::OBJECT_TYPE,
            ObjectRef::new("role", role_id),
        ))
    }

    /// Grants a permission directly to a user.
    pub async fn assign_permission_to_user(
        &self,
        permission_id: &str,
        user_id: &str,
    ) -> Result<Warrant, Error> {
        self.warrants
            .relate(
                ObjectRef::new(Permission::OBJECT_TYPE, permission_id),
                MEMBER,
                Subject::new("user", user_id),
            )
            .await
    }

    /// Revokes a directly granted permission from a user.
    pub async fn remove_permission_from_user(
        &self,
        permission_id: &str,
        user_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.warrants
            .unrelate(
                ObjectRef::new(Permission::OBJECT_TYPE, permission_id),
                MEMBER,
                Subject::new("user", user_id),
            )
            .await
    }

    /// Lists the permissions a user holds, directly or through roles.
    pub fn list_for_user(&self, user_id: impl Into<String>) -> ListRequest<Permission> {
        self.objects.list_query(Query::select_objects(
            Permission::OBJECT_TYPE,
            ObjectRef::new("user", user_id),
        ))
    }
}

impl std::fmt::Debug for PermissionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionsClient").finish_non_exhaustive()
    }
}
