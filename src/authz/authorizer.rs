//! Authorizer trait for dependency injection.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use crate::authz::WarrantCheck;
use crate::{Client, Error};

/// Object-safe trait for the authorization check call.
///
/// The middleware takes any `Authorizer`, so tests can swap the real
/// [`Client`] for a [`MockClient`](crate::testing::MockClient).
///
/// ## Example
///
/// ```rust
/// use warrant::{Authorizer, Error, Subject, WarrantCheck};
///
/// async fn can_view(authz: &dyn Authorizer, user_id: &str) -> Result<bool, Error> {
///     authz
///         .is_authorized(WarrantCheck::new("dashboard", "main", "viewer", Subject::new("user", user_id)))
///         .await
/// }
/// ```
pub trait Authorizer: Send + Sync {
    /// Returns `Ok(true)` if the check passes, `Ok(false)` if it does not.
    fn is_authorized(
        &self,
        check: WarrantCheck,
    ) -> Pin<Box<dyn Future<Output = Result<bool, Error>> + Send + '_>>;
}

impl Authorizer for Client {
    fn is_authorized(
        &self,
        check: WarrantCheck,
    ) -> Pin<Box<dyn Future<Output = Result<bool, Error>> + Send + '_>> {
        Box::pin(self.check(check).into_future())
    }
}
