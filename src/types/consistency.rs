//! Warrant-Token consistency tokens and per-request options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// An opaque consistency token.
///
/// Write operations return a token identifying the snapshot that includes
/// the write. Passing that token (or the literal [`WarrantToken::LATEST`]) on
/// a later read sends it as the `Warrant-Token` header, asking the service
/// for a read at least as fresh. Without a token, reads may be eventually
/// consistent.
///
/// ```rust
/// use warrant::WarrantToken;
///
/// let token = WarrantToken::latest();
/// assert!(token.is_latest());
/// assert_eq!(token.to_string(), "latest");
///
/// let parsed: WarrantToken = "MjAyNC0wMy0wMQ==".parse().unwrap();
/// assert!(!parsed.is_latest());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarrantToken {
    value: String,
}

impl WarrantToken {
    /// The literal token requesting read-after-write consistency.
    pub const LATEST: &'static str = "latest";

    /// Creates a token from a raw value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the `"latest"` token.
    pub fn latest() -> Self {
        Self::new(Self::LATEST)
    }

    /// Returns `true` if this is the `"latest"` token.
    pub fn is_latest(&self) -> bool {
        self.value == Self::LATEST
    }

    /// Returns the raw token value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the token and returns the inner value.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Display for WarrantToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for WarrantToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::invalid_argument("warrant token cannot be empty"));
        }
        Ok(WarrantToken::new(s))
    }
}

impl From<String> for WarrantToken {
    fn from(value: String) -> Self {
        WarrantToken::new(value)
    }
}

impl From<&str> for WarrantToken {
    fn from(value: &str) -> Self {
        WarrantToken::new(value)
    }
}

impl AsRef<str> for WarrantToken {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Per-call request options.
///
/// Currently carries only the consistency token.
///
/// ```rust
/// use warrant::RequestOptions;
///
/// let eventual = RequestOptions::default();
/// assert!(eventual.warrant_token.is_none());
///
/// let fresh = RequestOptions::latest();
/// assert!(fresh.warrant_token.unwrap().is_latest());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Token sent as the `Warrant-Token` header.
    pub warrant_token: Option<WarrantToken>,
}

impl RequestOptions {
    /// Options requesting a read at least as fresh as `token`.
    pub fn with_token(token: impl Into<WarrantToken>) -> Self {
        Self {
            warrant_token: Some(token.into()),
        }
    }

    /// Options requesting read-after-write consistency.
    pub fn latest() -> Self {
        Self::with_token(WarrantToken::latest())
    }
}
