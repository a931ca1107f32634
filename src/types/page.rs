//! Cursor pagination types shared by every list operation.

use serde::{Deserialize, Serialize};

/// A page of results.
///
/// Cursors are opaque; the only contract is that passing a returned cursor
/// back yields the adjacent page. Each page is a fresh read, so there is no
/// snapshot consistency across pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    /// The items in this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Cursor for the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_cursor: Option<String>,
    /// Cursor for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> ListResult<T> {
    /// Returns `true` if this page is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if the service reported a following page.
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Maps every item, preserving both cursors.
    pub fn map<U, F>(self, f: F) -> ListResult<U>
    where
        F: FnMut(T) -> U,
    {
        ListResult {
            results: self.results.into_iter().map(f).collect(),
            prev_cursor: self.prev_cursor,
            next_cursor: self.next_cursor,
        }
    }

    /// Maps every item fallibly, preserving both cursors.
    pub fn try_map<U, E, F>(self, f: F) -> Result<ListResult<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(ListResult {
            results: self.results.into_iter().map(f).collect::<Result<_, _>>()?,
            prev_cursor: self.prev_cursor,
            next_cursor: self.next_cursor,
        })
    }
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            prev_cursor: None,
            next_cursor: None,
        }
    }
}

/// Sort order for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    /// Descending order.
    #[serde(rename = "DESC")]
    Descending,
}

impl SortOrder {
    /// Returns the string representation for API queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Pagination and sorting parameters, encoded as query-string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Continue backwards from this cursor.
    pub prev_cursor: Option<String>,
    /// Continue forwards from this cursor.
    pub next_cursor: Option<String>,
    /// Field to sort by (e.g. `"createdAt"`).
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

impl ListParams {
    /// Appends the set parameters as URL-encoded `key=value` pairs.
    pub(crate) fn push_query(&self, query_parts: &mut Vec<String>) {
        if let Some(cursor) = &self.prev_cursor {
            query_parts.push(format!("prevCursor={}", urlencoding::encode(cursor)));
        }
        if let Some(cursor) = &self.next_cursor {
            query_parts.push(format!("nextCursor={}", urlencoding::encode(cursor)));
        }
        if let Some(sort_by) = &self.sort_by {
            query_parts.push(format!("sortBy={}", urlencoding::encode(sort_by)));
        }
        if let Some(sort_order) = &self.sort_order {
            query_parts.push(format!("sortOrder={}", sort_order.as_str()));
        }
        if let Some(limit) = self.limit {
            query_parts.push(format!("limit={}", limit));
        }
    }
}

/// Joins a path with `key=value` pairs.
pub(crate) fn with_query(path: &str, query_parts: &[String]) -> String {
    if query_parts.is_empty() {
        path.to_owned()
    } else {
        format!("{}?{}", path, query_parts.join("&"))
    }
}

/// Expands to the pagination and consistency setters of a list request.
///
/// The request type needs `params: ListParams` and `options: RequestOptions`
/// fields.
macro_rules! list_request_setters {
    () => {
        /// Sets the maximum number of results to return.
        pub fn limit(mut self, limit: u32) -> Self {
            self.params.limit = Some(limit);
            self
        }

        /// Continues backwards from a previously returned cursor.
        pub fn prev_cursor(mut self, cursor: impl Into<String>) -> Self {
            self.params.prev_cursor = Some(cursor.into());
            self
        }

        /// Continues forwards from a previously returned cursor.
        pub fn next_cursor(mut self, cursor: impl Into<String>) -> Self {
            self.params.next_cursor = Some(cursor.into());
            self
        }

        /// Sets the field to sort by.
        pub fn sort_by(mut self, field: impl Into<String>) -> Self {
            self.params.sort_by = Some(field.into());
            self
        }

        /// Sets the sort direction.
        pub fn sort_order(mut self, order: $crate::types::SortOrder) -> Self {
            self.params.sort_order = Some(order);
            self
        }

        /// Reads at least as fresh as `token`.
        pub fn warrant_token(mut self, token: impl Into<$crate::types::WarrantToken>) -> Self {
            self.options.warrant_token = Some(token.into());
            self
        }

        /// Requests read-after-write consistency.
        pub fn latest(self) -> Self {
            self.warrant_token($crate::types::WarrantToken::latest())
        }
    };
}

pub(crate) use list_request_setters;
