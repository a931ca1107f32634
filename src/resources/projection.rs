//! Projection of generic objects onto typed resources.

use std::marker::PhantomData;

use crate::authz::query::Query;
use crate::resources::list::ListRequest;
use crate::resources::objects::{CreateObjectParams, ObjectsClient, UpdateObjectParams};
use crate::types::{Meta, Object, RequestOptions, WarrantToken};
use crate::Error;

/// A resource stored as an object with a fixed type tag.
pub(crate) trait Resource: Sized + Send + 'static {
    /// The object type every instance is stored under.
    const OBJECT_TYPE: &'static str;

    /// Builds the resource from an object of [`Self::OBJECT_TYPE`].
    fn from_object(object: Object) -> Result<Self, Error>;
}

/// Rejects objects whose type does not match the resource's tag.
pub(crate) fn expect_type(object: &Object, object_type: &str) -> Result<(), Error> {
    if object.object_type != object_type {
        return Err(Error::invalid_response(format!(
            "expected object of type {:?}, got {:?}",
            object_type, object.object_type
        )));
    }
    Ok(())
}

/// Removes a string field from metadata. Empty metadata becomes `None`.
pub(crate) fn take_string(meta: &mut Option<Meta>, key: &str) -> Option<String> {
    let map = meta.as_mut()?;
    let value = match map.remove(key) {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => {
            // Not a string: leave it for the caller to see in `meta`.
            map.insert(key.to_owned(), other);
            None
        }
        None => None,
    };
    if map.is_empty() {
        *meta = None;
    }
    value
}

/// Merges typed fields into metadata. Returns `None` when nothing is set.
pub(crate) fn with_fields(meta: Option<Meta>, fields: &[(&str, Option<&String>)]) -> Option<Meta> {
    let mut meta = meta.unwrap_or_default();
    for (key, value) in fields {
        if let Some(value) = value {
            meta.insert((*key).to_owned(), serde_json::Value::String((*value).clone()));
        }
    }
    if meta.is_empty() { None } else { Some(meta) }
}

/// Object CRUD fixed to one resource type.
pub(crate) struct TypedObjects<R> {
    objects: ObjectsClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for TypedObjects<R> {
    fn clone(&self) -> Self {
        Self {
            objects: self.objects.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> TypedObjects<R> {
    pub(crate) fn new(objects: ObjectsClient) -> Self {
        Self {
            objects,
            _resource: PhantomData,
        }
    }

    fn create_params(object_id: Option<String>, meta: Option<Meta>) -> CreateObjectParams {
        CreateObjectParams {
            object_type: R::OBJECT_TYPE.to_owned(),
            object_id,
            meta,
        }
    }

    pub(crate) async fn create(
        &self,
        object_id: Option<String>,
        meta: Option<Meta>,
    ) -> Result<R, Error> {
        let object = self
            .objects
            .create(Self::create_params(object_id, meta))
            .await?;
        R::from_object(object)
    }

    pub(crate) async fn batch_create(
        &self,
        items: Vec<(Option<String>, Option<Meta>)>,
    ) -> Result<Vec<R>, Error> {
        let params = items
            .into_iter()
            .map(|(object_id, meta)| Self::create_params(object_id, meta))
            .collect();
        self.objects
            .batch_create(params)
            .await?
            .into_iter()
            .map(R::from_object)
            .collect()
    }

    pub(crate) async fn get(&self, object_id: &str, options: &RequestOptions) -> Result<R, Error> {
        R::from_object(self.objects.get(R::OBJECT_TYPE, object_id, options).await?)
    }

    pub(crate) async fn update(&self, object_id: &str, meta: Option<Meta>) -> Result<R, Error> {
        let object = self
            .objects
            .update(R::OBJECT_TYPE, object_id, UpdateObjectParams { meta })
            .await?;
        R::from_object(object)
    }

    pub(crate) async fn delete(&self, object_id: &str) -> Result<Option<WarrantToken>, Error> {
        self.objects.delete(R::OBJECT_TYPE, object_id).await
    }

    pub(crate) fn list(&self) -> ListRequest<R> {
        ListRequest::objects(
            self.objects.client().clone(),
            Some(R::OBJECT_TYPE.to_owned()),
            R::from_object,
        )
    }

    pub(crate) fn list_query(&self, query: Query) -> ListRequest<R> {
        ListRequest::query(self.objects.client().clone(), query, R::from_object)
    }
}
