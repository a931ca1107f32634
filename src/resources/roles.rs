//! Roles.

use serde::{Deserialize, Serialize};

use crate::authz::query::Query;
use crate::resources::list::ListRequest;
use crate::resources::objects::ObjectsClient;
use crate::resources::projection::{Resource, TypedObjects, expect_type, take_string, with_fields};
use crate::resources::warrants::WarrantsClient;
use crate::authz::check::MEMBER;
use crate::types::{Meta, Object, ObjectRef, RequestOptions, Subject, Warrant, WarrantToken};
use crate::{Client, Error};

/// A role, stored as an object of type `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// The role id.
    pub role_id: String,
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

impl Resource for Role {
    const OBJECT_TYPE: &'static str = "role";

    fn from_object(object: Object) -> Result<Self, Error> {
        expect_type(&object, Self::OBJECT_TYPE)?;
        let mut meta = object.meta;
        Ok(Self {
            role_id: object.object_id,
            name: take_string(&mut meta, "name"),
            description: take_string(&mut meta, "description"),
            meta,
            created_at: object.created_at,
        })
    }
}

/// Parameters for creating a role.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct CreateRoleParams {
    /// The role id.
    #[builder(into)]
    pub role_id: String,
    /// Display name.
    #[builder(into)]
    pub name: Option<String>,
    /// Description.
    #[builder(into)]
    pub description: Option<String>,
    /// Additional metadata.
    pub meta: Option<Meta>,
}

impl CreateRoleParams {
    fn into_parts(self) -> (Option<String>, Option<Meta>) {
        let meta = with_fields(
            self.meta,
            &[
                ("name", self.name.as_ref()),
                ("description", self.description.as_ref()),
            ],
        );
        (Some(self.role_id), meta)
    }
}

/// Parameters for updating a role. Metadata is replaced, not merged.
#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct UpdateRoleParams {
    /// Display name.
    #[builder(into)]
    pub name: Option<String>,
    /// Description.
    #[builder(into)]
    pub description: Option<String>,
    /// Additional metadata.
    pub meta: Option<Meta>,
}

/// Client for roles.
///
/// Access via `client.roles()`.
///
/// ```rust,no_run
/// use warrant::Client;
/// use warrant::resources::CreateRoleParams;
///
/// # async fn example(client: Client) -> Result<(), warrant::Error> {
/// let roles = client.roles();
/// roles.create(CreateRoleParams::builder().role_id("admin").name("Administrator").build()).await?;
/// roles.assign_role_to_user("admin", "alice").await?;
///
/// let alice_roles = roles.list_for_user("alice").latest().await?;
/// assert!(alice_roles.results.iter().any(|r| r.role_id == "admin"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RolesClient {
    objects: TypedObjects<Role>,
    warrants: WarrantsClient,
}

impl RolesClient {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            objects: TypedObjects::new(ObjectsClient::new(client.clone())),
            warrants: WarrantsClient::new(client),
        }
    }

    /// Creates a role.
    pub async fn create(&self, params: CreateRoleParams) -> Result<Role, Error> {
        let (id, meta) = params.into_parts();
        self.objects.create(id, meta).await
    }

    /// Creates several roles in one request.
    pub async fn batch_create(&self, params: Vec<CreateRoleParams>) -> Result<Vec<Role>, Error> {
        let items = params.into_iter().map(CreateRoleParams::into_parts).collect();
        self.objects.batch_create(items).await
    }

    /// Fetches a role.
    pub async fn get(&self, role_id: &str, options: &RequestOptions) -> Result<Role, Error> {
        self.objects.get(role_id, options).await
    }

    /// Updates a role.
    pub async fn update(&self, role_id: &str, params: UpdateRoleParams) -> Result<Role, Error> {
        let meta = with_fields(
            params.meta,
            &[
                ("name", params.name.as_ref()),
                ("description", params.description.as_ref()),
            ],
        );
        self.objects.update(role_id, meta).await
    }

    /// Deletes a role.
    pub async fn delete(&self, role_id: &str) -> Result<Option<WarrantToken>, Error> {
        self.objects.delete(role_id).await
    }

    /// Lists roles.
    pub fn list(&self) -> ListRequest<Role> {
        self.objects.list()
    }

    /// Makes a user a member of a role.
    pub async fn assign_role_to_user(&self, role_id: &str, user_id: &str) -> Result<Warrant, Error> {
        self.warrants
            .relate(
                ObjectRef::new(Role::OBJECT_TYPE, role_id),
                MEMBER,
                Subject::new("user", user_id),
            )
            .await
    }

    /// Removes a user from a role.
    pub async fn remove_role_from_user(
        &self,
        role_id: &str,
        user_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        self.warrants
            .unrelate(
                ObjectRef::new(Role::OBJECT_TYPE, role_id),
                MEMBER,
                Subject::new("user", user_id),
            )
            .await
    }

    /// Lists the roles a user holds.
    pub fn list_for_user(&self, user_id: impl Into<String>) -> ListRequest<Role> {
        self.objects.list_query(Query::select_objects(
            Role::OBJECT_TYPE,
            ObjectRef::new("user", user_id),
        ))
    }
}

impl std::fmt::Debug for RolesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolesClient").finish_non_exhaustive()
    }
}
