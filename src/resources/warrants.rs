//! Relationship tuple ("warrant") management.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use reqwest::Method;
use serde::Serialize;

use crate::client::Client;
use crate::client::inner::Endpoint;
use crate::types::page::with_query;
use crate::types::{
    ListParams, ListResult, ObjectRef, RequestOptions, Subject, Warrant, WarrantToken,
};
use crate::Error;

const WARRANTS_PATH: &str = "/v1/warrants";

/// Parameters identifying a warrant to create or delete.
///
/// ```rust
/// use warrant::Subject;
/// use warrant::resources::WarrantParams;
///
/// let params = WarrantParams::builder()
///     .object_type("report")
///     .object_id("q3")
///     .relation("viewer")
///     .subject(Subject::new("user", "alice"))
///     .policy(r#"geo == "us""#)
///     .build();
/// assert_eq!(params.policy.as_deref(), Some(r#"geo == "us""#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct WarrantParams {
    /// The object type.
    #[builder(into)]
    pub object_type: String,
    /// The object id.
    #[builder(into)]
    pub object_id: String,
    /// The relation.
    #[builder(into)]
    pub relation: String,
    /// The subject.
    pub subject: Subject,
    /// Optional policy expression, sent verbatim.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

impl WarrantParams {
    fn to_warrant(&self) -> Warrant {
        let mut warrant = Warrant::new(
            self.object_type.clone(),
            self.object_id.clone(),
            self.relation.clone(),
            self.subject.clone(),
        );
        warrant.policy = self.policy.clone();
        warrant
    }
}

impl From<Warrant> for WarrantParams {
    fn from(w: Warrant) -> Self {
        Self {
            object_type: w.object_type,
            object_id: w.object_id,
            relation: w.relation,
            subject: w.subject,
            policy: w.policy,
        }
    }
}

/// Client for warrants.
///
/// Access via `client.warrants()`.
///
/// ## Example
///
/// ```rust,no_run
/// use warrant::{Client, RequestOptions, Subject};
/// use warrant::resources::WarrantParams;
///
/// # async fn example(client: Client) -> Result<(), warrant::Error> {
/// let warrants = client.warrants();
///
/// let created = warrants
///     .create(
///         WarrantParams::builder()
///             .object_type("document")
///             .object_id("readme")
///             .relation("viewer")
///             .subject(Subject::new("user", "alice"))
///             .build(),
///     )
///     .await?;
///
/// let page = warrants.list().object_type("document").latest().await?;
/// # let _ = (created, page);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WarrantsClient {
    client: Client,
}

impl WarrantsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a warrant, returning it with the write's consistency token.
    pub async fn create(&self, params: WarrantParams) -> Result<Warrant, Error> {
        params.to_warrant().validate()?;
        let (mut warrant, token): (Warrant, _) = self
            .client
            .inner()
            .request_with_token(Method::POST, WARRANTS_PATH, Some(&params))
            .await?;
        warrant.warrant_token = token.or(warrant.warrant_token);
        Ok(warrant)
    }

    /// Creates several warrants in one request.
    pub async fn batch_create(&self, params: Vec<WarrantParams>) -> Result<Vec<Warrant>, Error> {
        for p in &params {
            p.to_warrant().validate()?;
        }
        let (mut warrants, token): (Vec<Warrant>, _) = self
            .client
            .inner()
            .request_with_token(Method::POST, WARRANTS_PATH, Some(&params))
            .await?;
        if let Some(token) = token {
            for warrant in &mut warrants {
                warrant.warrant_token = Some(token.clone());
            }
        }
        Ok(warrants)
    }

    /// Deletes a warrant, returning the write's consistency token.
    pub async fn delete(&self, params: WarrantParams) -> Result<Option<WarrantToken>, Error> {
        params.to_warrant().validate()?;
        self.client
            .inner()
            .request_token(Method::DELETE, WARRANTS_PATH, Some(&params))
            .await
    }

    /// Deletes several warrants in one request.
    pub async fn batch_delete(
        &self,
        params: Vec<WarrantParams>,
    ) -> Result<Option<WarrantToken>, Error> {
        for p in &params {
            p.to_warrant().validate()?;
        }
        self.client
            .inner()
            .request_token(Method::DELETE, WARRANTS_PATH, Some(&params))
            .await
    }

    /// Lists warrants, optionally filtered.
    pub fn list(&self) -> ListWarrantsRequest {
        ListWarrantsRequest {
            client: self.client.clone(),
            filter: WarrantFilter::default(),
            params: ListParams::default(),
            options: RequestOptions::default(),
        }
    }

    /// Creates `object#relation@subject` without a policy.
    pub(crate) async fn relate(
        &self,
        object: ObjectRef,
        relation: &str,
        subject: Subject,
    ) -> Result<Warrant, Error> {
        self.create(relation_params(object, relation, subject)).await
    }

    /// Deletes `object#relation@subject`.
    pub(crate) async fn unrelate(
        &self,
        object: ObjectRef,
        relation: &str,
        subject: Subject,
    ) -> Result<Option<WarrantToken>, Error> {
        self.delete(relation_params(object, relation, subject)).await
    }
}

impl std::fmt::Debug for WarrantsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarrantsClient").finish_non_exhaustive()
    }
}

fn relation_params(object: ObjectRef, relation: &str, subject: Subject) -> WarrantParams {
    WarrantParams {
        object_type: object.object_type,
        object_id: object.object_id,
        relation: relation.to_owned(),
        subject,
        policy: None,
    }
}

#[derive(Debug, Clone, Default)]
struct WarrantFilter {
    object_type: Option<String>,
    object_id: Option<String>,
    relation: Option<String>,
    subject_type: Option<String>,
    subject_id: Option<String>,
    subject_relation: Option<String>,
}

impl WarrantFilter {
    fn push_query(&self, query_parts: &mut Vec<String>) {
        let fields = [
            ("objectType", &self.object_type),
            ("objectId", &self.object_id),
            ("relation", &self.relation),
            ("subjectType", &self.subject_type),
            ("subjectId", &self.subject_id),
            ("subjectRelation", &self.subject_relation),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                query_parts.push(format!("{}={}", key, urlencoding::encode(value)));
            }
        }
    }
}

/// Request to list warrants.
#[must_use = "list requests do nothing until awaited"]
pub struct ListWarrantsRequest {
    client: Client,
    filter: WarrantFilter,
    params: ListParams,
    options: RequestOptions,
}

impl ListWarrantsRequest {
    /// Only warrants on objects of this type.
    pub fn object_type(mut self, object_type: impl Into<String>) -> Self {
        self.filter.object_type = Some(object_type.into());
        self
    }

    /// Only warrants on this object id.
    pub fn object_id(mut self, object_id: impl Into<String>) -> Self {
        self.filter.object_id = Some(object_id.into());
        self
    }

    /// Only warrants with this relation.
    pub fn relation(mut self, relation: impl Into<String>) -> Self {
        self.filter.relation = Some(relation.into());
        self
    }

    /// Only warrants whose subject is of this type.
    pub fn subject_type(mut self, subject_type: impl Into<String>) -> Self {
        self.filter.subject_type = Some(subject_type.into());
        self
    }

    /// Only warrants whose subject has this id.
    pub fn subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.filter.subject_id = Some(subject_id.into());
        self
    }

    /// Only warrants whose subject set uses this relation.
    pub fn subject_relation(mut self, subject_relation: impl Into<String>) -> Self {
        self.filter.subject_relation = Some(subject_relation.into());
        self
    }

    crate::types::page::list_request_setters!();

    async fn execute(self) -> Result<ListResult<Warrant>, Error> {
        let mut query_parts = Vec::new();
        self.filter.push_query(&mut query_parts);
        self.params.push_query(&mut query_parts);
        let path = with_query(WARRANTS_PATH, &query_parts);

        self.client
            .inner()
            .request::<(), _>(Endpoint::Api, Method::GET, &path, None, &self.options)
            .await
    }
}

impl IntoFuture for ListWarrantsRequest {
    type Output = Result<ListResult<Warrant>, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}
