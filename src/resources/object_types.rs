//! Object types: the relations each object type supports and how they are
//! inherited.

use std::collections::BTreeMap;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::client::inner::{Endpoint, segment};
use crate::types::object::require_non_empty;
use crate::types::page::with_query;
use crate::types::{ListParams, ListResult, RequestOptions, WarrantToken};
use crate::Error;

const OBJECT_TYPES_PATH: &str = "/v2/object-types";

/// How a relation is granted.
///
/// An empty rule means the relation is only granted directly. `inherit_if`
/// names another relation that implies this one, or one of the combinators
/// `anyOf`, `allOf` and `noneOf` applied over `rules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRule {
    /// Relation (or combinator) that implies this relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_if: Option<String>,
    /// Type of a related object whose relation is inherited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of_type: Option<String>,
    /// Relation linking this object to the `of_type` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_relation: Option<String>,
    /// Nested rules for combinators.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RelationRule>,
}

impl RelationRule {
    /// A relation granted only by direct warrants.
    pub fn direct() -> Self {
        Self::default()
    }

    /// A relation implied by `relation` on the same object.
    pub fn inherit_if(relation: impl Into<String>) -> Self {
        Self {
            inherit_if: Some(relation.into()),
            ..Self::default()
        }
    }

    /// A relation implied by `relation` on an object of `of_type` that is
    /// linked to this one through `with_relation`.
    pub fn inherit_from(
        relation: impl Into<String>,
        of_type: impl Into<String>,
        with_relation: impl Into<String>,
    ) -> Self {
        Self {
            inherit_if: Some(relation.into()),
            of_type: Some(of_type.into()),
            with_relation: Some(with_relation.into()),
            rules: Vec::new(),
        }
    }

    /// Granted if any of `rules` holds.
    pub fn any_of(rules: impl IntoIterator<Item = RelationRule>) -> Self {
        Self::combinator("anyOf", rules)
    }

    /// Granted if all of `rules` hold.
    pub fn all_of(rules: impl IntoIterator<Item = RelationRule>) -> Self {
        Self::combinator("allOf", rules)
    }

    /// Granted if none of `rules` holds.
    pub fn none_of(rules: impl IntoIterator<Item = RelationRule>) -> Self {
        Self::combinator("noneOf", rules)
    }

    fn combinator(op: &str, rules: impl IntoIterator<Item = RelationRule>) -> Self {
        Self {
            inherit_if: Some(op.to_owned()),
            rules: rules.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// An object type definition.
///
/// ```rust
/// use warrant::resources::{ObjectType, RelationRule};
///
/// let document = ObjectType::new("document")
///     .relation("owner", RelationRule::direct())
///     .relation("editor", RelationRule::inherit_if("owner"))
///     .relation(
///         "viewer",
///         RelationRule::any_of([
///             RelationRule::inherit_if("editor"),
///             RelationRule::inherit_from("member", "team", "viewer"),
///         ]),
///     );
/// assert_eq!(document.relations.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    /// The type name.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Relation name to the rule granting it.
    #[serde(default)]
    pub relations: BTreeMap<String, RelationRule>,
}

impl ObjectType {
    /// An object type with no relations.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            relations: BTreeMap::new(),
        }
    }

    /// Adds or replaces a relation.
    #[must_use]
    pub fn relation(mut self, name: impl Into<String>, rule: RelationRule) -> Self {
        self.relations.insert(name.into(), rule);
        self
    }
}

/// Client for object type definitions.
///
/// Access via `client.object_types()`.
#[derive(Clone)]
pub struct ObjectTypesClient {
    client: Client,
}

impl ObjectTypesClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates an object type.
    pub async fn create(&self, object_type: ObjectType) -> Result<ObjectType, Error> {
        require_non_empty("object type", &object_type.object_type)?;
        self.client
            .inner()
            .request(
                Endpoint::Api,
                Method::POST,
                OBJECT_TYPES_PATH,
                Some(&object_type),
                &RequestOptions::default(),
            )
            .await
    }

    /// Fetches an object type.
    pub async fn get(
        &self,
        object_type: &str,
        options: &RequestOptions,
    ) -> Result<ObjectType, Error> {
        let path = object_type_path(object_type)?;
        self.client
            .inner()
            .request::<(), _>(Endpoint::Api, Method::GET, &path, None, options)
            .await
    }

    /// Replaces the definition of `object_type`.
    pub async fn update(
        &self,
        object_type: &str,
        definition: ObjectType,
    ) -> Result<ObjectType, Error> {
        let path = object_type_path(object_type)?;
        self.client
            .inner()
            .request(
                Endpoint::Api,
                Method::PUT,
                &path,
                Some(&definition),
                &RequestOptions::default(),
            )
            .await
    }

    /// Replaces several definitions in one request.
    pub async fn batch_update(
        &self,
        definitions: Vec<ObjectType>,
    ) -> Result<Vec<ObjectType>, Error> {
        for definition in &definitions {
            require_non_empty("object type", &definition.object_type)?;
        }
        self.client
            .inner()
            .request(
                Endpoint::Api,
                Method::PUT,
                OBJECT_TYPES_PATH,
                Some(&definitions),
                &RequestOptions::default(),
            )
            .await
    }

    /// Deletes an object type, returning the write's consistency token.
    pub async fn delete(&self, object_type: &str) -> Result<Option<WarrantToken>, Error> {
        let path = object_type_path(object_type)?;
        self.client
            .inner()
            .request_token::<()>(Method::DELETE, &path, None)
            .await
    }

    /// Lists object types.
    pub fn list(&self) -> ListObjectTypesRequest {
        ListObjectTypesRequest {
            client: self.client.clone(),
            params: ListParams::default(),
            options: RequestOptions::default(),
        }
    }
}

impl std::fmt::Debug for ObjectTypesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectTypesClient").finish_non_exhaustive()
    }
}

fn object_type_path(object_type: &str) -> Result<String, Error> {
    require_non_empty("object type", object_type)?;
    Ok(format!("{}/{}", OBJECT_TYPES_PATH, segment(object_type)))
}

/// Request to list object types.
#[must_use = "list requests do nothing until awaited"]
pub struct ListObjectTypesRequest {
    client: Client,
    params: ListParams,
    options: RequestOptions,
}

impl ListObjectTypesRequest {
    crate::types::page::list_request_setters!();

    async fn execute(self) -> Result<ListResult<ObjectType>, Error> {
        let mut query_parts = Vec::new();
        self.params.push_query(&mut query_parts);
        let path = with_query(OBJECT_TYPES_PATH, &query_parts);

        self.client
            .inner()
            .request::<(), _>(Endpoint::Api, Method::GET, &path, None, &self.options)
            .await
    }
}

impl IntoFuture for ListObjectTypesRequest {
    type Output = Result<ListResult<ObjectType>, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}
