//! Base endpoint URLs.

use url::Url;

use crate::Error;

/// Default base URL for CRUD and query traffic.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.warrant.dev";

/// Default base URL for authorization checks.
pub const DEFAULT_AUTHORIZE_ENDPOINT: &str = "https://api.warrant.dev";

/// Default base URL of the hosted self-service dashboard.
pub const DEFAULT_SELF_SERVICE_DASH_ENDPOINT: &str = "https://self-serve.warrant.dev";

/// The three base URLs the SDK talks to.
///
/// Each is independently overridable, which supports split deployments where
/// check traffic is routed to a different host (for example an edge agent)
/// than CRUD traffic.
///
/// ```rust
/// use warrant::config::Endpoints;
///
/// let endpoints = Endpoints::default()
///     .with_authorize("http://localhost:3000")
///     .unwrap();
/// assert_eq!(endpoints.api().as_str(), "https://api.warrant.dev/");
/// assert_eq!(endpoints.authorize().as_str(), "http://localhost:3000/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api: Url,
    authorize: Url,
    self_service_dash: Url,
}

impl Endpoints {
    /// Returns the API base URL.
    pub fn api(&self) -> &Url {
        &self.api
    }

    /// Returns the authorization check base URL.
    pub fn authorize(&self) -> &Url {
        &self.authorize
    }

    /// Returns the self-service dashboard base URL.
    pub fn self_service_dash(&self) -> &Url {
        &self.self_service_dash
    }

    /// Overrides the API base URL.
    pub fn with_api(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        self.api = parse_base(url.as_ref())?;
        Ok(self)
    }

    /// Overrides the authorization check base URL.
    pub fn with_authorize(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        self.authorize = parse_base(url.as_ref())?;
        Ok(self)
    }

    /// Overrides the self-service dashboard base URL.
    pub fn with_self_service_dash(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        self.self_service_dash = parse_base(url.as_ref())?;
        Ok(self)
    }
}

impl Default for Endpoints {
    // The constants are valid absolute URLs.
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            api: Url::parse(DEFAULT_API_ENDPOINT).expect("valid default endpoint"),
            authorize: Url::parse(DEFAULT_AUTHORIZE_ENDPOINT).expect("valid default endpoint"),
            self_service_dash: Url::parse(DEFAULT_SELF_SERVICE_DASH_ENDPOINT)
                .expect("valid default endpoint"),
        }
    }
}

/// Parses a base URL, requiring an http(s) scheme.
///
/// Request paths are appended to the base, so it may carry a path prefix but
/// no query string or fragment.
pub(crate) fn parse_base(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url)
        .map_err(|e| Error::configuration(format!("invalid endpoint {:?}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "endpoint {:?} must use http or https, not {}",
            url,
            parsed.scheme()
        )));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::configuration(format!(
            "endpoint {:?} must not contain a query string or fragment",
            url
        )));
    }
    Ok(parsed)
}
