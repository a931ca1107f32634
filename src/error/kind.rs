//! Error kind enumeration for categorizing SDK errors.

/// Categorization of SDK errors.
///
/// Every failure surfaced by the SDK falls into exactly one of these
/// categories. Match on [`Error::kind()`](crate::Error::kind) to decide how
/// to react.
///
/// | ErrorKind             | Origin                                   |
/// |-----------------------|------------------------------------------|
/// | `InvalidArgument`     | Caller passed an empty or malformed id   |
/// | `InvalidPayload`      | Request body could not be serialized     |
/// | `RequestConstruction` | URL or header could not be built         |
/// | `Transport`           | DNS, connection, TLS or timeout failure  |
/// | `Api`                 | Service answered with a status >= 400    |
/// | `InvalidResponse`     | Service answered with malformed JSON     |
/// | `Configuration`       | Client or middleware set up incorrectly  |
///
/// The SDK never retries. Whether an error is worth retrying is the
/// caller's decision; [`ErrorKind::is_transient()`] is a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A parameter failed local validation before any request was sent.
    #[error("invalid argument")]
    InvalidArgument,

    /// The request payload could not be serialized to JSON.
    #[error("invalid payload")]
    InvalidPayload,

    /// The HTTP request could not be constructed (bad URL, path or header value).
    #[error("request construction failed")]
    RequestConstruction,

    /// Network-level failure: DNS, connection refused, TLS, timeout.
    #[error("transport error")]
    Transport,

    /// The service returned a status outside `[200, 400)`.
    ///
    /// The status code and raw response body are available through
    /// [`Error::status()`](crate::Error::status) and
    /// [`Error::body()`](crate::Error::body).
    #[error("api error")]
    Api,

    /// The response body could not be decoded.
    #[error("invalid response")]
    InvalidResponse,

    /// Configuration error (missing API key, invalid endpoint URL, missing
    /// middleware id source).
    #[error("configuration error")]
    Configuration,
}

impl ErrorKind {
    /// Returns `true` for failures that may succeed if the same call is made again.
    ///
    /// Only transport failures qualify. API errors are reported as-is; use
    /// [`Error::status()`](crate::Error::status) to inspect 429/5xx responses.
    ///
    /// # Example
    ///
    /// ```rust
    /// use warrant::ErrorKind;
    ///
    /// assert!(ErrorKind::Transport.is_transient());
    /// assert!(!ErrorKind::InvalidPayload.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::Transport)
    }

    /// Returns `true` if the error was raised locally before a request was sent.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidArgument
                | ErrorKind::InvalidPayload
                | ErrorKind::RequestConstruction
                | ErrorKind::Configuration
        )
    }
}
