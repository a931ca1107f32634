//! The uniform object representation underlying every resource.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Free-form object metadata: string keys to arbitrary JSON values.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// An object stored in Warrant, identified by `(object_type, object_id)`.
///
/// Users, tenants, roles, permissions, features and pricing tiers are all
/// objects with a fixed `object_type`; the typed resource clients project
/// them into dedicated structs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    /// The object type (e.g. `"document"`).
    pub object_type: String,
    /// The object id, unique within its type.
    pub object_id: String,
    /// Attached metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Server-side creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Object {
    /// Returns the `(type, id)` reference of this object.
    pub fn to_ref(&self) -> ObjectRef {
        ObjectRef::new(self.object_type.clone(), self.object_id.clone())
    }

    /// Returns a metadata value as a string, if present and a string.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.as_ref()?.get(key)?.as_str()
    }
}

/// A reference to an object by its composite key.
///
/// Formats as `type:id`.
///
/// ```rust
/// use warrant::ObjectRef;
///
/// let r: ObjectRef = "tenant:acme".parse().unwrap();
/// assert_eq!(r.object_type, "tenant");
/// assert_eq!(r.object_id, "acme");
/// assert_eq!(r.to_string(), "tenant:acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    /// The object type.
    pub object_type: String,
    /// The object id.
    pub object_id: String,
}

impl ObjectRef {
    /// Creates a new object reference.
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

impl std::str::FromStr for ObjectRef {
    type Err = Error;

    /// Splits on the first `:`; the id may itself contain `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((object_type, object_id)) if !object_type.is_empty() && !object_id.is_empty() => {
                Ok(Self::new(object_type, object_id))
            }
            _ => Err(Error::invalid_argument(format!(
                "invalid object reference {:?}: expected type:id",
                s
            ))),
        }
    }
}

/// Rejects empty identifiers before a request is built.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{} cannot be empty", field)));
    }
    Ok(())
}
