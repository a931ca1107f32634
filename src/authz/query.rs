//! Structured relationship queries.
//!
//! Queries are built as values and rendered to the service's query language
//! only when sent. Types and relations are validated as identifiers and ids
//! may not be empty or contain whitespace, so a rendered query always parses
//! back into the same parts.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::client::inner::Endpoint;
use crate::types::page::with_query;
use crate::types::{
    ListParams, ListResult, Meta, Object, ObjectRef, RequestOptions, Warrant,
};
use crate::Error;

const ANY_RELATION: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum QueryKind {
    SelectObjects {
        object_type: String,
        subject: ObjectRef,
        relation: Option<String>,
    },
    SelectSubjects {
        subject_type: String,
        object: ObjectRef,
        relation: Option<String>,
    },
    Raw(String),
}

/// A relationship query.
///
/// ```rust
/// use warrant::{ObjectRef, Query};
///
/// let q = Query::select_objects("role", ObjectRef::new("user", "alice"));
/// assert_eq!(q.render().unwrap(), "select role where user:alice is *");
///
/// let q = Query::select_subjects("user", ObjectRef::new("tenant", "acme")).relation("admin");
/// assert_eq!(q.render().unwrap(), "select admin of type user for tenant:acme");
///
/// // ids may contain ':' without ambiguity
/// let q = Query::select_objects("tenant", ObjectRef::new("user", "auth0|a:b"));
/// assert_eq!(q.render().unwrap(), "select tenant where user:auth0|a:b is *");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    kind: QueryKind,
}

impl Query {
    /// Objects of `object_type` that `subject` holds a relation on.
    ///
    /// Renders as `select <object_type> where <subject> is <relation|*>`.
    pub fn select_objects(object_type: impl Into<String>, subject: ObjectRef) -> Self {
        Self {
            kind: QueryKind::SelectObjects {
                object_type: object_type.into(),
                subject,
                relation: None,
            },
        }
    }

    /// Subjects of `subject_type` that hold a relation on `object`.
    ///
    /// Renders as `select <relation|*> of type <subject_type> for <object>`.
    pub fn select_subjects(subject_type: impl Into<String>, object: ObjectRef) -> Self {
        Self {
            kind: QueryKind::SelectSubjects {
                subject_type: subject_type.into(),
                object,
                relation: None,
            },
        }
    }

    /// A query written directly in the query language, sent unchanged.
    pub fn raw(query: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::Raw(query.into()),
        }
    }

    /// Restricts the query to one relation instead of any (`*`).
    ///
    /// Has no effect on raw queries.
    #[must_use]
    pub fn relation(mut self, relation: impl Into<String>) -> Self {
        match &mut self.kind {
            QueryKind::SelectObjects { relation: r, .. }
            | QueryKind::SelectSubjects { relation: r, .. } => *r = Some(relation.into()),
            QueryKind::Raw(_) => {}
        }
        self
    }

    /// Renders the query text.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if a type or relation is not an
    /// identifier, or an id is empty or contains whitespace.
    pub fn render(&self) -> Result<String, Error> {
        match &self.kind {
            QueryKind::SelectObjects {
                object_type,
                subject,
                relation,
            } => {
                check_identifier("object type", object_type)?;
                let relation = checked_relation(relation.as_deref())?;
                Ok(format!(
                    "select {} where {} is {}",
                    object_type,
                    checked_ref(subject)?,
                    relation
                ))
            }
            QueryKind::SelectSubjects {
                subject_type,
                object,
                relation,
            } => {
                check_identifier("subject type", subject_type)?;
                let relation = checked_relation(relation.as_deref())?;
                Ok(format!(
                    "select {} of type {} for {}",
                    relation,
                    subject_type,
                    checked_ref(object)?
                ))
            }
            QueryKind::Raw(q) => {
                if q.trim().is_empty() {
                    return Err(Error::invalid_argument("query cannot be empty"));
                }
                Ok(q.clone())
            }
        }
    }
}

fn check_identifier(field: &str, value: &str) -> Result<(), Error> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "invalid {} {:?}: expected letters, digits, '-' or '_'",
            field, value
        )))
    }
}

fn checked_relation(relation: Option<&str>) -> Result<&str, Error> {
    match relation {
        None | Some(ANY_RELATION) => Ok(ANY_RELATION),
        Some(r) => {
            check_identifier("relation", r)?;
            Ok(r)
        }
    }
}

fn checked_ref(r: &ObjectRef) -> Result<String, Error> {
    check_identifier("object type", &r.object_type)?;
    if r.object_id.is_empty() || r.object_id.chars().any(char::is_whitespace) {
        return Err(Error::invalid_argument(format!(
            "invalid object id {:?}: must be non-empty without whitespace",
            r.object_id
        )));
    }
    Ok(r.to_string())
}

/// One row of a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// The matched object's type.
    pub object_type: String,
    /// The matched object's id.
    pub object_id: String,
    /// The matched object's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// The warrant that produced the match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warrant: Option<Warrant>,
    /// `true` if the match was derived through inheritance rather than a
    /// direct warrant.
    #[serde(default)]
    pub is_implicit: bool,
}

impl QueryResult {
    /// Converts the row into the matched object.
    pub fn into_object(self) -> Object {
        Object {
            object_type: self.object_type,
            object_id: self.object_id,
            meta: self.meta,
            created_at: None,
        }
    }
}

/// Sends one query request.
pub(crate) async fn fetch(
    client: &Client,
    query: &Query,
    params: &ListParams,
    options: &RequestOptions,
) -> Result<ListResult<QueryResult>, Error> {
    let q = query.render()?;
    tracing::debug!(query = %q, "running warrant query");

    let mut query_parts = vec![format!("q={}", urlencoding::encode(&q))];
    params.push_query(&mut query_parts);
    let path = with_query("/v2/query", &query_parts);

    client
        .inner()
        .request::<(), _>(Endpoint::Api, Method::GET, &path, None, options)
        .await
}

/// Request to run a relationship query.
///
/// Created by [`Client::query`].
#[must_use = "query requests do nothing until awaited"]
pub struct QueryRequest {
    client: Client,
    query: Query,
    params: ListParams,
    options: RequestOptions,
}

impl QueryRequest {
    crate::types::page::list_request_setters!();

    async fn execute(self) -> Result<ListResult<QueryResult>, Error> {
        fetch(&self.client, &self.query, &self.params, &self.options).await
    }
}

impl IntoFuture for QueryRequest {
    type Output = Result<ListResult<QueryResult>, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

impl Client {
    /// Runs a relationship query.
    ///
    /// ```rust,no_run
    /// use warrant::{Client, ObjectRef, Query};
    ///
    /// # async fn example(client: Client) -> Result<(), warrant::Error> {
    /// let page = client
    ///     .query(Query::select_objects("document", ObjectRef::new("user", "alice")).relation("viewer"))
    ///     .limit(20)
    ///     .await?;
    /// for row in page.results {
    ///     println!("{}:{} implicit={}", row.object_type, row.object_id, row.is_implicit);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn query(&self, query: Query) -> QueryRequest {
        QueryRequest {
            client: self.clone(),
            query,
            params: ListParams::default(),
            options: RequestOptions::default(),
        }
    }
}
