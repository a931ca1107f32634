//! Generic object CRUD, the backbone every typed resource delegates to.

use reqwest::Method;
use serde::Serialize;

use crate::client::Client;
use crate::client::inner::{Endpoint, segment};
use crate::resources::list::ListRequest;
use crate::types::object::require_non_empty;
use crate::types::{Meta, Object, ObjectRef, RequestOptions, WarrantToken};
use crate::Error;

const OBJECTS_PATH: &str = "/v2/objects";

/// Parameters for creating an object.
///
/// When `object_id` is omitted the service assigns one.
///
/// ```rust
/// use warrant::resources::CreateObjectParams;
///
/// let params = CreateObjectParams::builder()
///     .object_type("document")
///     .object_id("readme")
///     .build();
/// assert_eq!(params.object_type, "document");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct CreateObjectParams {
    /// The object type.
    #[builder(into)]
    pub object_type: String,
    /// The object id; assigned by the service when absent.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Metadata to attach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Parameters for updating an object. The metadata is replaced, not merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, bon::Builder)]
pub struct UpdateObjectParams {
    /// Replacement metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Client for generic objects.
///
/// Access via `client.objects()`.
///
/// ## Example
///
/// ```rust,no_run
/// use warrant::{Client, RequestOptions};
/// use warrant::resources::CreateObjectParams;
///
/// # async fn example(client: Client) -> Result<(), warrant::Error> {
/// let objects = client.objects();
///
/// let doc = objects
///     .create(CreateObjectParams::builder().object_type("document").object_id("readme").build())
///     .await?;
///
/// let fetched = objects.get("document", "readme", &RequestOptions::latest()).await?;
/// assert_eq!(doc.object_id, fetched.object_id);
///
/// let page = objects.list().object_type("document").limit(10).latest().await?;
/// # let _ = page;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ObjectsClient {
    client: Client,
}

impl ObjectsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Creates an object.
    pub async fn create(&self, params: CreateObjectParams) -> Result<Object, Error> {
        validate_create(&params)?;
        self.client
            .inner()
            .request(
                Endpoint::Api,
                Method::POST,
                OBJECTS_PATH,
                Some(&params),
                &RequestOptions::default(),
            )
            .await
    }

    /// Creates several objects in one request, returning them in input order.
    pub async fn batch_create(&self, params: Vec<CreateObjectParams>) -> Result<Vec<Object>, Error> {
        for p in &params {
            validate_create(p)?;
        }
        self.client
            .inner()
            .request(
                Endpoint::Api,
                Method::POST,
                OBJECTS_PATH,
                Some(&params),
                &RequestOptions::default(),
            )
            .await
    }

    /// Fetches an object by its composite key.
    pub async fn get(
        &self,
        object_type: &str,
        object_id: &str,
        options: &RequestOptions,
    ) -> Result<Object, Error> {
        let path = object_path(object_type, object_id)?;
        self.client
            .inner()
            .request::<(), _>(Endpoint::Api, Method::GET, &path, None, options)
            .await
    }

    /// Replaces an object's metadata.
    pub async fn update(
        &self,
        object_type: &str,
        object_id: &str,
        params: UpdateObjectParams,
    ) -> Result<Object, Error> {
        let path = object_path(object_type, object_id)?;
        self.client
            .inner()
            .request(
                Endpoint::Api,
                Method::PUT,
                &path,
                Some(&params),
                &RequestOptions::default(),
            )
            .await
    }

    /// Deletes an object, returning the consistency token of the write.
    pub async fn delete(
        &self,
        object_type: &str,
        object_id: &str,
    ) -> Result<Option<WarrantToken>, Error> {
        let path = object_path(object_type, object_id)?;
        self.client
            .inner()
            .request_token::<()>(Method::DELETE, &path, None)
            .await
    }

    /// Deletes several objects in one request, returning the shared token.
    pub async fn batch_delete(
        &self,
        objects: Vec<ObjectRef>,
    ) -> Result<Option<WarrantToken>, Error> {
        for object in &objects {
            require_non_empty("object type", &object.object_type)?;
            require_non_empty("object id", &object.object_id)?;
        }
        self.client
            .inner()
            .request_token(Method::DELETE, OBJECTS_PATH, Some(&objects))
            .await
    }

    /// Lists objects.
    ///
    /// Returns a builder; await it to send the request.
    pub fn list(&self) -> ListRequest<Object> {
        ListRequest::objects(self.client.clone(), None, Ok)
    }
}

impl std::fmt::Debug for ObjectsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectsClient").finish_non_exhaustive()
    }
}

fn validate_create(params: &CreateObjectParams) -> Result<(), Error> {
    require_non_empty("object type", &params.object_type)?;
    if let Some(id) = &params.object_id {
        require_non_empty("object id", id)?;
    }
    Ok(())
}

fn object_path(object_type: &str, object_id: &str) -> Result<String, Error> {
    require_non_empty("object type", object_type)?;
    require_non_empty("object id", object_id)?;
    Ok(format!(
        "{}/{}/{}",
        OBJECTS_PATH,
        segment(object_type),
        segment(object_id)
    ))
}
