//! Client types for connecting to Warrant.
//!
//! [`Client`] is the entry point. Resource clients hang off it:
//! - [`objects()`](Client::objects) and [`object_types()`](Client::object_types)
//! - [`users()`](Client::users), [`tenants()`](Client::tenants),
//!   [`roles()`](Client::roles), [`permissions()`](Client::permissions),
//!   [`features()`](Client::features), [`pricing_tiers()`](Client::pricing_tiers)
//! - [`warrants()`](Client::warrants) and [`sessions()`](Client::sessions)
//!
//! Authorization checks and queries are methods on `Client` itself.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warrant::prelude::*;
//!
//! # async fn example() -> warrant::Result<()> {
//! let client = Client::builder().api_key("my_api_key").build()?;
//!
//! client.users().create(CreateUserParams::builder().user_id("alice").build()).await?;
//! client.roles().assign_role_to_user("admin", "alice").await?;
//!
//! let allowed = client.check_user_has_role("alice", "admin").await?;
//! assert!(allowed);
//! # Ok(())
//! # }
//! ```

mod builder;
mod default;
pub(crate) mod inner;

pub use builder::{ClientBuilder, HasApiKey, NoApiKey};
pub use default::{default_client, set_default};

use std::sync::Arc;

use crate::config::Config;
use crate::resources::{
    FeaturesClient, ObjectTypesClient, ObjectsClient, PermissionsClient, PricingTiersClient,
    RolesClient, SessionsClient, TenantsClient, UsersClient, WarrantsClient,
};
use crate::Error;

/// The Warrant SDK client.
///
/// ## Thread Safety
///
/// `Client` is `Clone`, `Send` and `Sync`. Clones share one configuration and
/// one HTTP connection pool, and configuration never changes after
/// construction.
///
/// ## Example
///
/// ```rust
/// use warrant::Client;
///
/// let client = Client::builder().api_key("my_api_key").build().unwrap();
///
/// let client2 = client.clone();
/// let users = client2.users();
/// # let _ = users;
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<inner::ClientInner>,
}

impl Client {
    /// Creates a client from an explicit configuration.
    pub fn new(config: Config) -> Result<Self, Error> {
        Ok(Self {
            inner: Arc::new(inner::ClientInner::new(config)?),
        })
    }

    /// Creates a new client builder.
    pub fn builder() -> ClientBuilder<NoApiKey> {
        ClientBuilder::new()
    }

    /// Creates a client configured from `WARRANT_*` environment variables.
    ///
    /// See [`Config::from_env`].
    pub fn from_env() -> Result<Self, Error> {
        Self::new(Config::from_env()?)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns the generic object client.
    pub fn objects(&self) -> ObjectsClient {
        ObjectsClient::new(self.clone())
    }

    /// Returns the object type client.
    pub fn object_types(&self) -> ObjectTypesClient {
        ObjectTypesClient::new(self.clone())
    }

    /// Returns the user client.
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.clone())
    }

    /// Returns the tenant client.
    pub fn tenants(&self) -> TenantsClient {
        TenantsClient::new(self.clone())
    }

    /// Returns the role client.
    pub fn roles(&self) -> RolesClient {
        RolesClient::new(self.clone())
    }

    /// Returns the permission client.
    pub fn permissions(&self) -> PermissionsClient {
        PermissionsClient::new(self.clone())
    }

    /// Returns the feature client.
    pub fn features(&self) -> FeaturesClient {
        FeaturesClient::new(self.clone())
    }

    /// Returns the pricing tier client.
    pub fn pricing_tiers(&self) -> PricingTiersClient {
        PricingTiersClient::new(self.clone())
    }

    /// Returns the warrant client.
    pub fn warrants(&self) -> WarrantsClient {
        WarrantsClient::new(self.clone())
    }

    /// Returns the session client.
    pub fn sessions(&self) -> SessionsClient {
        SessionsClient::new(self.clone())
    }

    /// Returns a reference to the inner client.
    pub(crate) fn inner(&self) -> &inner::ClientInner {
        &self.inner
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_endpoint", &self.inner.config.endpoints().api().as_str())
            .finish_non_exhaustive()
    }
}

/// Builds a client whose every endpoint points at `uri`.
#[cfg(test)]
pub(crate) fn test_client(uri: &str) -> Client {
    Client::builder()
        .api_key("test_key")
        .api_endpoint(uri)
        .authorize_endpoint(uri)
        .self_service_dash_endpoint("https://dash.example.com")
        .build()
        .unwrap()
}
