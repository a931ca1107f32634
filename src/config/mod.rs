//! Configuration types for the Warrant SDK.
//!
//! Configuration is an explicit, immutable [`Config`] value handed to
//! [`Client::new`](crate::Client::new) (usually through
//! [`Client::builder()`](crate::Client::builder)). Nothing is read from
//! process-global mutable state; changing configuration means building a new
//! client.
//!
//! - [`Config`]: API key, endpoints and timeouts
//! - [`Endpoints`]: the API, authorize and self-service dashboard base URLs

mod endpoints;

pub use endpoints::{
    DEFAULT_API_ENDPOINT, DEFAULT_AUTHORIZE_ENDPOINT, DEFAULT_SELF_SERVICE_DASH_ENDPOINT,
    Endpoints,
};

pub(crate) use endpoints::parse_base;

use std::fmt;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::Error;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "WARRANT_API_KEY";
/// Environment variable overriding the API endpoint.
pub const ENV_API_ENDPOINT: &str = "WARRANT_API_ENDPOINT";
/// Environment variable overriding the authorize endpoint.
pub const ENV_AUTHORIZE_ENDPOINT: &str = "WARRANT_AUTHORIZE_ENDPOINT";
/// Environment variable overriding the self-service dashboard endpoint.
pub const ENV_SELF_SERVICE_DASH_ENDPOINT: &str = "WARRANT_SELF_SERVICE_DASH_ENDPOINT";

/// Immutable client configuration.
///
/// The API key is kept in zeroizing memory and never printed by `Debug`.
///
/// ```rust
/// use warrant::config::Config;
///
/// let config = Config::new("my_api_key").unwrap();
/// assert_eq!(config.endpoints().api().as_str(), "https://api.warrant.dev/");
/// assert!(config.timeout().is_none());
/// ```
#[derive(Clone)]
pub struct Config {
    api_key: Zeroizing<String>,
    endpoints: Endpoints,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl Config {
    /// Creates a configuration with the default endpoints.
    ///
    /// Returns a configuration error if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::configuration("API key is required"));
        }
        Ok(Self {
            api_key: Zeroizing::new(api_key),
            endpoints: Endpoints::default(),
            timeout: None,
            connect_timeout: None,
        })
    }

    /// Loads configuration from `WARRANT_*` environment variables.
    ///
    /// `WARRANT_API_KEY` is required; the endpoint variables are optional.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .ok_or_else(|| Error::configuration(format!("{} is not set", ENV_API_KEY)))?;
        let mut config = Self::new(api_key)?;

        let mut endpoints = config.endpoints.clone();
        if let Some(url) = lookup(ENV_API_ENDPOINT) {
            endpoints = endpoints.with_api(url)?;
        }
        if let Some(url) = lookup(ENV_AUTHORIZE_ENDPOINT) {
            endpoints = endpoints.with_authorize(url)?;
        }
        if let Some(url) = lookup(ENV_SELF_SERVICE_DASH_ENDPOINT) {
            endpoints = endpoints.with_self_service_dash(url)?;
        }
        config.endpoints = endpoints;

        Ok(config)
    }

    /// Replaces the endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets a whole-request timeout. Without one, requests wait as long as the
    /// HTTP client does (no library-imposed limit).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the configured endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns the request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the connect timeout, if any.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
