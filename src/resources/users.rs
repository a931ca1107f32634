//! Users.

use serde::{Deserialize, Serialize};

use crate::authz::query::Query;
use crate::resources::list::ListRequest;
use crate::resources::objects::ObjectsClient;
use crate::resources::projection::{Resource, TypedObjects, expect_type, take_string, with_fields};
use crate::types::{Meta, Object, ObjectRef, RequestOptions, WarrantToken};
use crate::{Client, Error};

/// A user, stored as an object of type `user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user id.
    pub user_id: String,
    /// The user's email, stored in metadata under `email`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Remaining metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Server-side creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Resource for User {
    const OBJECT_TYPE: &'static str = "user";

    fn from_object(object: Object) -> Result<Self, Error> {
        expect_type(&object, Self::OBJECT_TYPE)?;
        let mut meta = object.meta;
        Ok(Self {
            user_id: object.object_id,
            email: take_string(&mut meta, "email"),
            meta,
            created_at: object.created_at,
        })
    }
}

/// Parameters for creating a user. The id is assigned by the service when
/// omitted.
#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct CreateUserParams {
    /// The user id.
    #[builder(into)]
    pub user_id: Option<String>,
    /// The user's email.
    #[builder(into)]
    pub email: Option<String>,
    /// Additional metadata.
    pub meta: Option<Meta>,
}

impl CreateUserParams {
    fn into_parts(self) -> (Option<String>, Option<Meta>) {
        let meta = with_fields(self.meta, &[("email", self.email.as_ref())]);
        (self.user_id, meta)
    }
}

/// Parameters for updating a user. Metadata is replaced, not merged.
#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct UpdateUserParams {
    /// The user's email.
    #[builder(into)]
    pub email: Option<String>,
    /// Additional metadata.
    pub meta: Option<Meta>,
}

/// Client for users.
///
/// Access via `client.users()`.
///
/// ```rust,no_run
/// use warrant::Client;
/// use warrant::resources::CreateUserParams;
///
/// # async fn example(client: Client) -> Result<(), warrant::Error> {
/// let user = client
///     .users()
///     .create(CreateUserParams::builder().user_id("alice").email("alice@example.com").build())
///     .await?;
/// assert_eq!(user.email.as_deref(), Some("alice@example.com"));
///
/// let members = client.users().list_for_tenant("acme").latest().await?;
/// # let _ = members;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct UsersClient {
    objects: TypedObjects<User>,
}

impl UsersClient {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            objects: TypedObjects::new(ObjectsClient::new(client)),
        }
    }

    /// Creates a user.
    pub async fn create(&self, params: CreateUserParams) -> Result<User, Error> {
        let (id, meta) = params.into_parts();
        self.objects.create(id, meta).await
    }

    /// Creates several users in one request.
    pub async fn batch_create(&self, params: Vec<CreateUserParams>) -> Result<Vec<User>, Error> {
        let items = params.into_iter().map(CreateUserParams::into_parts).collect();
        self.objects.batch_create(items).await
    }

    /// Fetches a user.
    pub async fn get(&self, user_id: &str, options: &RequestOptions) -> Result<User, Error> {
        self.objects.get(user_id, options).await
    }

    /// Updates a user.
    pub async fn update(&self, user_id: &str, params: UpdateUserParams) -> Result<User, Error> {
        let meta = with_fields(params.meta, &[("email", params.email.as_ref())]);
        self.objects.update(user_id, meta).await
    }

    /// Deletes a user.
    pub async fn delete(&self, user_id: &str) -> Result<Option<WarrantToken>, Error> {
        self.objects.delete(user_id).await
    }

    /// Lists users.
    pub fn list(&self) -> ListRequest<User> {
        self.objects.list()
    }

    /// Lists the users of a tenant, with any relation.
    pub fn list_for_tenant(&self, tenant_id: impl Into<String>) -> ListRequest<User> {
        self.objects.list_query(Query::select_subjects(
            User::OBJECT_TYPE,
            ObjectRef::new("tenant", tenant_id),
        ))
    }
}

impl std::fmt::Debug for UsersClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersClient").finish_non_exhaustive()
    }
}
