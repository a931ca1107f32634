//! Client builder with typestate pattern.

use std::marker::PhantomData;
use std::time::Duration;

use crate::config::{Config, Endpoints};
use crate::{Client, Error};

/// Marker type: API key not yet provided.
pub struct NoApiKey;

/// Marker type: API key has been provided.
pub struct HasApiKey;

/// Builder for creating [`Client`] instances.
///
/// Uses the typestate pattern so that `build()` is only available once an
/// API key has been set.
///
/// ## Required Configuration
///
/// - `api_key()`: The Warrant API key
///
/// ## Optional Configuration
///
/// - `api_endpoint()`: Base URL for CRUD, query and session calls
/// - `authorize_endpoint()`: Base URL for authorization checks
/// - `self_service_dash_endpoint()`: Base URL of the self-service dashboard
/// - `timeout()` / `connect_timeout()`: HTTP timeouts (none by default)
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use warrant::Client;
///
/// let client = Client::builder()
///     .api_key("my_api_key")
///     .authorize_endpoint("http://localhost:3000")
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
pub struct ClientBuilder<KeyState> {
    api_key: Option<String>,
    api_endpoint: Option<String>,
    authorize_endpoint: Option<String>,
    self_service_dash_endpoint: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    _key_state: PhantomData<KeyState>,
}

impl ClientBuilder<NoApiKey> {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_endpoint: None,
            authorize_endpoint: None,
            self_service_dash_endpoint: None,
            timeout: None,
            connect_timeout: None,
            _key_state: PhantomData,
        }
    }

    /// Sets the API key sent as `Authorization: ApiKey <key>`.
    pub fn api_key(self, api_key: impl Into<String>) -> ClientBuilder<HasApiKey> {
        ClientBuilder {
            api_key: Some(api_key.into()),
            api_endpoint: self.api_endpoint,
            authorize_endpoint: self.authorize_endpoint,
            self_service_dash_endpoint: self.self_service_dash_endpoint,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            _key_state: PhantomData,
        }
    }
}

impl Default for ClientBuilder<NoApiKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ClientBuilder<K> {
    /// Overrides the API base URL (default `https://api.warrant.dev`).
    #[must_use]
    pub fn api_endpoint(mut self, url: impl Into<String>) -> Self {
        self.api_endpoint = Some(url.into());
        self
    }

    /// Overrides the authorization check base URL (default
    /// `https://api.warrant.dev`).
    #[must_use]
    pub fn authorize_endpoint(mut self, url: impl Into<String>) -> Self {
        self.authorize_endpoint = Some(url.into());
        self
    }

    /// Overrides the self-service dashboard base URL (default
    /// `https://self-serve.warrant.dev`).
    #[must_use]
    pub fn self_service_dash_endpoint(mut self, url: impl Into<String>) -> Self {
        self.self_service_dash_endpoint = Some(url.into());
        self
    }

    /// Sets a whole-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

impl ClientBuilder<HasApiKey> {
    /// Validates the configuration and builds the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is blank or an endpoint
    /// is not an absolute http(s) URL.
    pub fn build(self) -> Result<Client, Error> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::configuration("API key is required"))?;

        let mut endpoints = Endpoints::default();
        if let Some(url) = self.api_endpoint {
            endpoints = endpoints.with_api(url)?;
        }
        if let Some(url) = self.authorize_endpoint {
            endpoints = endpoints.with_authorize(url)?;
        }
        if let Some(url) = self.self_service_dash_endpoint {
            endpoints = endpoints.with_self_service_dash(url)?;
        }

        let mut config = Config::new(api_key)?.with_endpoints(endpoints);
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            config = config.with_connect_timeout(timeout);
        }

        Client::new(config)
    }
}
