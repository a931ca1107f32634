//! Tower middleware that gates requests on a Warrant check.
//!
//! Each request runs exactly one check. If it passes the request reaches the
//! wrapped service; otherwise the deny handler answers (a bare
//! `401 Unauthorized` by default).
//!
//! ```text
//! request ──▶ resolve ids ──▶ check ──┬─ authorized ──▶ inner service
//!                                     └─ denied / error ──▶ deny handler
//! ```
//!
//! A check that errors, or an id extractor that returns `None`, counts as a
//! denial. Decisions are not cached.
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use warrant::Client;
//! use warrant::middleware::{EnsureHasPermission, EnsureIsAuthorized};
//!
//! fn user_from_header(req: &http::Request<axum::body::Body>) -> Option<String> {
//!     req.headers().get("x-user-id")?.to_str().ok().map(str::to_owned)
//! }
//!
//! # fn example(client: Client) -> Result<(), warrant::Error> {
//! let reports = EnsureIsAuthorized::new("report", "viewer")
//!     .object_id_from(|req| req.uri().path().rsplit('/').next().map(str::to_owned))
//!     .user_id_from(user_from_header)
//!     .layer(client.clone())?;
//!
//! let admin = EnsureHasPermission::new("manage-billing")
//!     .user_id_from(user_from_header)
//!     .layer(client)?;
//!
//! let app: Router = Router::new()
//!     .route("/reports/{id}", get(|| async { "report" }).route_layer(reports))
//!     .route("/billing", get(|| async { "billing" }).route_layer(admin));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

mod service;

pub use service::{AuthorizeLayer, AuthorizeService};

use std::sync::Arc;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::{Request, StatusCode};

use crate::authz::{Authorizer, WarrantCheck};
use crate::types::Subject;
use crate::Error;

/// Pulls an id out of an incoming request.
pub type IdExtractor = Arc<dyn Fn(&Request<Body>) -> Option<String> + Send + Sync>;

/// Builds the response sent when a request is denied.
pub type DenyHandler = Arc<dyn Fn() -> Response + Send + Sync>;

#[derive(Clone)]
pub(crate) enum IdSource {
    Static(String),
    From(IdExtractor),
}

impl IdSource {
    fn resolve(&self, request: &Request<Body>) -> Option<String> {
        match self {
            IdSource::Static(id) => Some(id.clone()),
            IdSource::From(extract) => extract(request).filter(|id| !id.is_empty()),
        }
    }
}

impl std::fmt::Debug for IdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdSource::Static(id) => f.debug_tuple("Static").field(id).finish(),
            IdSource::From(_) => f.write_str("From(..)"),
        }
    }
}

/// Everything one gated route needs to build its check.
pub(crate) struct Gate {
    object_type: String,
    relation: String,
    object_id: IdSource,
    user_id: IdSource,
    authorizer: Arc<dyn Authorizer>,
    on_denied: DenyHandler,
}

impl Gate {
    /// The check for `request`, or `None` if an id could not be resolved.
    pub(crate) fn check_for(&self, request: &Request<Body>) -> Option<WarrantCheck> {
        let object_id = self.object_id.resolve(request)?;
        let user_id = self.user_id.resolve(request)?;
        Some(WarrantCheck::new(
            self.object_type.clone(),
            object_id,
            self.relation.clone(),
            Subject::new("user", user_id),
        ))
    }

    pub(crate) fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }

    pub(crate) fn deny(&self) -> Response {
        (self.on_denied)()
    }
}

fn unauthorized() -> Response {
    StatusCode::UNAUTHORIZED.into_response()
}

/// Requires the requesting user to hold `relation` on an object.
///
/// Both the object id and the user id must be given, either as fixed values
/// or as extractors run against each request.
#[derive(Clone)]
#[must_use = "call .layer() to build the middleware"]
pub struct EnsureIsAuthorized {
    object_type: String,
    relation: String,
    object_id: Option<IdSource>,
    user_id: Option<IdSource>,
    on_denied: Option<DenyHandler>,
}

impl EnsureIsAuthorized {
    /// Starts a gate for `relation` on objects of `object_type`.
    pub fn new(object_type: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            relation: relation.into(),
            object_id: None,
            user_id: None,
            on_denied: None,
        }
    }

    /// Checks against one fixed object.
    pub fn object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(IdSource::Static(object_id.into()));
        self
    }

    /// Reads the object id from each request.
    pub fn object_id_from<F>(mut self, extract: F) -> Self
    where
        F: Fn(&Request<Body>) -> Option<String> + Send + Sync + 'static,
    {
        self.object_id = Some(IdSource::From(Arc::new(extract)));
        self
    }

    /// Checks on behalf of one fixed user.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(IdSource::Static(user_id.into()));
        self
    }

    /// Reads the user id from each request.
    pub fn user_id_from<F>(mut self, extract: F) -> Self
    where
        F: Fn(&Request<Body>) -> Option<String> + Send + Sync + 'static,
    {
        self.user_id = Some(IdSource::From(Arc::new(extract)));
        self
    }

    /// Replaces the default `401 Unauthorized` deny response.
    pub fn on_denied<F>(mut self, handler: F) -> Self
    where
        F: Fn() -> Response + Send + Sync + 'static,
    {
        self.on_denied = Some(Arc::new(handler));
        self
    }

    /// Builds the layer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the object type or relation is empty,
    /// or no object id or user id source was set.
    pub fn layer<A>(self, authorizer: A) -> Result<AuthorizeLayer, Error>
    where
        A: Authorizer + 'static,
    {
        self.layer_shared(Arc::new(authorizer))
    }

    /// Builds the layer around an already shared authorizer.
    ///
    /// # Errors
    ///
    /// Same as [`layer`](Self::layer).
    pub fn layer_shared(self, authorizer: Arc<dyn Authorizer>) -> Result<AuthorizeLayer, Error> {
        if self.object_type.is_empty() {
            return Err(Error::configuration("authorization gate needs an object type"));
        }
        if self.relation.is_empty() {
            return Err(Error::configuration("authorization gate needs a relation"));
        }
        let object_id = self.object_id.ok_or_else(|| {
            Error::configuration(format!(
                "authorization gate for {}#{} has no object id source",
                self.object_type, self.relation
            ))
        })?;
        let user_id = self.user_id.ok_or_else(|| {
            Error::configuration(format!(
                "authorization gate for {}#{} has no user id source",
                self.object_type, self.relation
            ))
        })?;

        Ok(AuthorizeLayer::new(Gate {
            object_type: self.object_type,
            relation: self.relation,
            object_id,
            user_id,
            authorizer,
            on_denied: self.on_denied.unwrap_or_else(|| Arc::new(unauthorized)),
        }))
    }
}

impl std::fmt::Debug for EnsureIsAuthorized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnsureIsAuthorized")
            .field("object_type", &self.object_type)
            .field("relation", &self.relation)
            .field("object_id", &self.object_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Requires the requesting user to hold a permission.
///
/// Shorthand for `EnsureIsAuthorized::new("permission", "member")` with a
/// fixed object id.
#[derive(Clone, Debug)]
#[must_use = "call .layer() to build the middleware"]
pub struct EnsureHasPermission {
    inner: EnsureIsAuthorized,
}

impl EnsureHasPermission {
    /// Starts a gate for `permission_id`.
    pub fn new(permission_id: impl Into<String>) -> Self {
        Self {
            inner: EnsureIsAuthorized::new("permission", crate::authz::check::MEMBER)
                .object_id(permission_id),
        }
    }

    /// Checks on behalf of one fixed user.
    pub fn user_id(self, user_id: impl Into<String>) -> Self {
        Self {
            inner: self.inner.user_id(user_id),
        }
    }

    /// Reads the user id from each request.
    pub fn user_id_from<F>(self, extract: F) -> Self
    where
        F: Fn(&Request<Body>) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            inner: self.inner.user_id_from(extract),
        }
    }

    /// Replaces the default `401 Unauthorized` deny response.
    pub fn on_denied<F>(self, handler: F) -> Self
    where
        F: Fn() -> Response + Send + Sync + 'static,
    {
        Self {
            inner: self.inner.on_denied(handler),
        }
    }

    /// Builds the layer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the permission id is empty or no user
    /// id source was set.
    pub fn layer<A>(self, authorizer: A) -> Result<AuthorizeLayer, Error>
    where
        A: Authorizer + 'static,
    {
        self.layer_shared(Arc::new(authorizer))
    }

    /// Builds the layer around an already shared authorizer.
    ///
    /// # Errors
    ///
    /// Same as [`layer`](Self::layer).
    pub fn layer_shared(self, authorizer: Arc<dyn Authorizer>) -> Result<AuthorizeLayer, Error> {
        if let Some(IdSource::Static(id)) = &self.inner.object_id
            && id.is_empty()
        {
            return Err(Error::configuration("permission gate needs a permission id"));
        }
        self.inner.layer_shared(authorizer)
    }
}
