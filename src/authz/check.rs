//! Authorization checks.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::client::inner::Endpoint;
use crate::types::object::require_non_empty;
use crate::types::{PolicyContext, RequestOptions, Subject, Warrant, WarrantToken};
use crate::Error;

const AUTHORIZE_PATH: &str = "/v2/authorize";

/// The `result` value the service returns for a granted check.
pub const AUTHORIZED: &str = "Authorized";

/// Relation used by the role, permission and feature convenience checks.
pub(crate) const MEMBER: &str = "member";

/// One tuple to check: does `subject` hold `relation` on the object?
///
/// ```rust
/// use warrant::{PolicyContext, Subject, WarrantCheck};
///
/// let check = WarrantCheck::new("report", "q3", "viewer", Subject::new("user", "alice"))
///     .with_context(PolicyContext::new().with("geo", "us"));
/// assert_eq!(check.to_string(), "report:q3#viewer@user:alice");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantCheck {
    /// The object type.
    pub object_type: String,
    /// The object id.
    pub object_id: String,
    /// The relation to check.
    pub relation: String,
    /// The subject.
    pub subject: Subject,
    /// Bindings for any policy attached to matching warrants.
    #[serde(skip_serializing_if = "PolicyContext::is_empty")]
    pub context: PolicyContext,
}

impl WarrantCheck {
    /// Creates a check without policy context.
    pub fn new(
        object_type: impl Into<String>,
        object_id: impl Into<String>,
        relation: impl Into<String>,
        subject: Subject,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
            relation: relation.into(),
            subject,
            context: PolicyContext::default(),
        }
    }

    /// Attaches policy context.
    #[must_use]
    pub fn with_context(mut self, context: PolicyContext) -> Self {
        self.context = context;
        self
    }

    fn validate(&self) -> Result<(), Error> {
        require_non_empty("object type", &self.object_type)?;
        require_non_empty("object id", &self.object_id)?;
        require_non_empty("relation", &self.relation)?;
        require_non_empty("subject type", &self.subject.object_type)?;
        require_non_empty("subject id", &self.subject.object_id)
    }
}

impl From<&Warrant> for WarrantCheck {
    fn from(w: &Warrant) -> Self {
        WarrantCheck::new(
            w.object_type.clone(),
            w.object_id.clone(),
            w.relation.clone(),
            w.subject.clone(),
        )
    }
}

impl std::fmt::Display for WarrantCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}#{}@{}",
            self.object_type, self.object_id, self.relation, self.subject
        )
    }
}

/// How several checks combine into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOp {
    /// Authorized only if every check passes.
    #[serde(rename = "allOf")]
    AllOf,
    /// Authorized if any check passes.
    #[serde(rename = "anyOf")]
    AnyOf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    op: Option<CheckOp>,
    warrants: &'a [WarrantCheck],
    consistent_read: bool,
    debug: bool,
}

/// The full response of a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// HTTP-style status code reported in the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// The decision, [`AUTHORIZED`] when granted.
    #[serde(default)]
    pub result: Option<String>,
    /// `true` if the decision was derived through inheritance.
    #[serde(default)]
    pub is_implicit: bool,
    /// Server processing time, present when debug was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_time: Option<i64>,
    /// Decision path, present when debug was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_path: Option<serde_json::Value>,
}

impl CheckResult {
    /// Returns `true` only if `result` is exactly [`AUTHORIZED`].
    ///
    /// Any other value, including a missing one or a result kind added to
    /// the service later, is treated as not authorized.
    pub fn is_authorized(&self) -> bool {
        self.result.as_deref() == Some(AUTHORIZED)
    }
}

/// Request to run an authorization check.
///
/// Await it for a `bool`, or call [`detailed`](Self::detailed) for the full
/// [`CheckResult`].
#[must_use = "check requests do nothing until awaited"]
pub struct CheckRequest {
    client: Client,
    op: Option<CheckOp>,
    checks: Vec<WarrantCheck>,
    consistent_read: bool,
    debug: bool,
    options: RequestOptions,
}

impl CheckRequest {
    fn new(client: Client, op: Option<CheckOp>, checks: Vec<WarrantCheck>) -> Self {
        Self {
            client,
            op,
            checks,
            consistent_read: false,
            debug: false,
            options: RequestOptions::default(),
        }
    }

    /// Sets the policy context on every check in the request.
    pub fn context(mut self, context: PolicyContext) -> Self {
        for check in &mut self.checks {
            check.context = context.clone();
        }
        self
    }

    /// Asks the service to evaluate against the primary datastore.
    pub fn consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = consistent_read;
        self
    }

    /// Asks the service to include the decision path.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Evaluates at least as fresh as `token`.
    pub fn warrant_token(mut self, token: impl Into<WarrantToken>) -> Self {
        self.options.warrant_token = Some(token.into());
        self
    }

    /// Requests read-after-write consistency.
    pub fn latest(self) -> Self {
        self.warrant_token(WarrantToken::latest())
    }

    /// Sends the check and returns the full result.
    pub async fn detailed(self) -> Result<CheckResult, Error> {
        if self.checks.is_empty() {
            return Err(Error::invalid_argument("at least one check is required"));
        }
        for check in &self.checks {
            check.validate()?;
        }

        let body = CheckBody {
            op: self.op,
            warrants: &self.checks,
            consistent_read: self.consistent_read,
            debug: self.debug,
        };

        let result: CheckResult = self
            .client
            .inner()
            .request(
                Endpoint::Authorize,
                Method::POST,
                AUTHORIZE_PATH,
                Some(&body),
                &self.options,
            )
            .await?;

        tracing::debug!(
            checks = self.checks.len(),
            result = result.result.as_deref().unwrap_or(""),
            "warrant check completed"
        );
        Ok(result)
    }

    async fn execute(self) -> Result<bool, Error> {
        Ok(self.detailed().await?.is_authorized())
    }
}

impl IntoFuture for CheckRequest {
    type Output = Result<bool, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

impl std::fmt::Debug for CheckRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRequest")
            .field("op", &self.op)
            .field("checks", &self.checks)
            .field("consistent_read", &self.consistent_read)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Checks a single tuple.
    ///
    /// ```rust,no_run
    /// use warrant::{Client, PolicyContext, Subject, WarrantCheck};
    ///
    /// # async fn example(client: Client) -> Result<(), warrant::Error> {
    /// let allowed = client
    ///     .check(WarrantCheck::new("report", "q3", "viewer", Subject::new("user", "alice")))
    ///     .context(PolicyContext::new().with("geo", "us"))
    ///     .await?;
    /// # let _ = allowed;
    /// # Ok(())
    /// # }
    /// ```
    pub fn check(&self, check: WarrantCheck) -> CheckRequest {
        CheckRequest::new(self.clone(), None, vec![check])
    }

    /// Checks several tuples combined with `op`.
    pub fn check_many(&self, op: CheckOp, checks: Vec<WarrantCheck>) -> CheckRequest {
        CheckRequest::new(self.clone(), Some(op), checks)
    }

    /// Checks whether a user has a permission.
    pub fn check_user_has_permission(
        &self,
        user_id: impl Into<String>,
        permission_id: impl Into<String>,
    ) -> CheckRequest {
        self.check(WarrantCheck::new(
            "permission",
            permission_id,
            MEMBER,
            Subject::new("user", user_id),
        ))
    }

    /// Checks whether a user has a role.
    pub fn check_user_has_role(
        &self,
        user_id: impl Into<String>,
        role_id: impl Into<String>,
    ) -> CheckRequest {
        self.check(WarrantCheck::new(
            "role",
            role_id,
            MEMBER,
            Subject::new("user", user_id),
        ))
    }

    /// Checks whether a subject (user, tenant or pricing tier) has a feature.
    pub fn check_has_feature(&self, subject: Subject, feature_id: impl Into<String>) -> CheckRequest {
        self.check(WarrantCheck::new("feature", feature_id, MEMBER, subject))
    }
}
