//! Main error type for the Warrant SDK.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;

/// The primary error type for Warrant SDK operations.
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── status: Option<u16>      (HTTP status, for ErrorKind::Api)
/// ├── body: Option<String>     (raw response body, for ErrorKind::Api)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use warrant::{Error, ErrorKind};
///
/// fn handle_error(err: Error) {
///     match err.kind() {
///         ErrorKind::Api if err.is_not_found() => println!("no such object"),
///         ErrorKind::Api => println!("HTTP {:?}: {:?}", err.status(), err.body()),
///         ErrorKind::Transport => println!("network failure: {}", err),
///         _ => println!("{}", err),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    status: Option<u16>,
    body: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use warrant::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::InvalidArgument, "object id cannot be empty");
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Creates an API error from a non-success HTTP status and the raw response body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body)
        };
        Self {
            kind: ErrorKind::Api,
            message: message.into(),
            status: Some(status),
            body: Some(body),
            source: None,
        }
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code for [`ErrorKind::Api`] errors.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the raw response body for [`ErrorKind::Api`] errors.
    ///
    /// The service usually answers with a JSON document; it is returned
    /// verbatim so callers can decode whatever shape they expect.
    #[inline]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns `true` if the service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Returns `true` if the service answered 401 (invalid or missing API key).
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// Returns `true` if the service answered 409 (duplicate object or warrant).
    pub fn is_conflict(&self) -> bool {
        self.status == Some(409)
    }

    /// Returns `true` if the service answered 429.
    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429)
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Creates an invalid payload error.
    pub fn invalid_payload(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidPayload, message)
    }

    /// Creates a request construction error.
    pub fn request_construction(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::RequestConstruction, message)
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_response(format!("JSON error: {}", err)).with_source(err)
    }
}
