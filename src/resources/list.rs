//! Cursor-paginated list requests shared by every object-backed resource.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use reqwest::Method;

use crate::authz::query::{self, Query};
use crate::client::Client;
use crate::client::inner::Endpoint;
use crate::types::page::with_query;
use crate::types::{ListParams, ListResult, Object, RequestOptions};
use crate::Error;

enum ListSource {
    /// `GET /v2/objects`, optionally filtered by type.
    Objects { object_type: Option<String> },
    /// A relationship query whose rows are remapped into objects.
    Query(Query),
}

/// Request to list objects, or objects projected into a typed resource.
///
/// Built by the `list()` and `list_for_*()` methods of the resource
/// clients. Await it to send the request:
///
/// ```rust,no_run
/// # async fn example(client: warrant::Client) -> Result<(), warrant::Error> {
/// let first = client.users().list().limit(50).await?;
/// if let Some(cursor) = first.next_cursor {
///     let second = client.users().list().limit(50).next_cursor(cursor).await?;
///     # let _ = second;
/// }
/// # Ok(())
/// # }
/// ```
#[must_use = "list requests do nothing until awaited"]
pub struct ListRequest<T> {
    client: Client,
    source: ListSource,
    params: ListParams,
    options: RequestOptions,
    project: fn(Object) -> Result<T, Error>,
}

impl<T> ListRequest<T> {
    pub(crate) fn objects(
        client: Client,
        object_type: Option<String>,
        project: fn(Object) -> Result<T, Error>,
    ) -> Self {
        Self {
            client,
            source: ListSource::Objects { object_type },
            params: ListParams::default(),
            options: RequestOptions::default(),
            project,
        }
    }

    pub(crate) fn query(
        client: Client,
        query: Query,
        project: fn(Object) -> Result<T, Error>,
    ) -> Self {
        Self {
            client,
            source: ListSource::Query(query),
            params: ListParams::default(),
            options: RequestOptions::default(),
            project,
        }
    }

    crate::types::page::list_request_setters!();

    /// Replaces all list parameters at once.
    pub fn params(mut self, params: ListParams) -> Self {
        self.params = params;
        self
    }

    async fn execute(self) -> Result<ListResult<T>, Error> {
        let page = match self.source {
            ListSource::Objects { object_type } => {
                let mut query_parts = Vec::new();
                if let Some(object_type) = &object_type {
                    query_parts.push(format!("objectType={}", urlencoding::encode(object_type)));
                }
                self.params.push_query(&mut query_parts);
                let path = with_query("/v2/objects", &query_parts);

                self.client
                    .inner()
                    .request::<(), ListResult<Object>>(
                        Endpoint::Api,
                        Method::GET,
                        &path,
                        None,
                        &self.options,
                    )
                    .await?
            }
            ListSource::Query(query) => {
                query::fetch(&self.client, &query, &self.params, &self.options)
                    .await?
                    .map(query::QueryResult::into_object)
            }
        };
        page.try_map(self.project)
    }
}

impl ListRequest<Object> {
    /// Restricts the listing to one object type.
    pub fn object_type(mut self, object_type: impl Into<String>) -> Self {
        if let ListSource::Objects { object_type: filter } = &mut self.source {
            *filter = Some(object_type.into());
        }
        self
    }
}

impl<T: Send + 'static> IntoFuture for ListRequest<T> {
    type Output = Result<ListResult<T>, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

impl<T> std::fmt::Debug for ListRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListRequest")
            .field("params", &self.params)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
