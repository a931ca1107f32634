//! Warrant type representing a relationship tuple in the authorization graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{ObjectRef, WarrantToken};
use crate::Error;

/// The actor side of a warrant.
///
/// A subject is either a single object (`user:alice`) or, when `relation` is
/// set, the set of subjects holding that relation on the object
/// (`role:admin#member`, "every member of role admin").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// The subject's object type.
    pub object_type: String,
    /// The subject's object id.
    pub object_id: String,
    /// Optional relation turning the subject into a subject set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

impl Subject {
    /// Creates a subject referring to a single object.
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
            relation: None,
        }
    }

    /// Turns the subject into a subject set over `relation`.
    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    /// Returns the `(type, id)` part of the subject.
    pub fn to_ref(&self) -> ObjectRef {
        ObjectRef::new(self.object_type.clone(), self.object_id.clone())
    }
}

impl From<ObjectRef> for Subject {
    fn from(r: ObjectRef) -> Self {
        Subject::new(r.object_type, r.object_id)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)?;
        if let Some(ref relation) = self.relation {
            write!(f, "#{}", relation)?;
        }
        Ok(())
    }
}

impl FromStr for Subject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (object, relation) = match s.split_once('#') {
            Some((object, relation)) if !relation.is_empty() => (object, Some(relation)),
            Some(_) => {
                return Err(Error::invalid_argument(format!(
                    "invalid subject {:?}: empty relation after '#'",
                    s
                )));
            }
            None => (s, None),
        };
        let object: ObjectRef = object.parse()?;
        let mut subject = Subject::from(object);
        subject.relation = relation.map(str::to_owned);
        Ok(subject)
    }
}

/// A relationship tuple: "`subject` has `relation` on `object`".
///
/// Warrants optionally carry a policy, a boolean expression evaluated by the
/// service against the context supplied at check time. The SDK never
/// interprets the policy; it is sent verbatim.
///
/// ## String Format
///
/// ```rust
/// use warrant::{Subject, Warrant};
///
/// let w: Warrant = "document:readme#viewer@user:alice".parse().unwrap();
/// assert_eq!(w.object_type, "document");
/// assert_eq!(w.relation, "viewer");
/// assert_eq!(w.subject, Subject::new("user", "alice"));
///
/// let w = Warrant::new("report", "q3", "viewer", Subject::new("role", "finance").with_relation("member"))
///     .with_policy(r#"geo == "us""#);
/// assert_eq!(w.to_string(), r#"report:q3#viewer@role:finance#member[geo == "us"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warrant {
    /// The object type.
    pub object_type: String,
    /// The object id.
    pub object_id: String,
    /// The relation the subject holds on the object.
    pub relation: String,
    /// The subject.
    pub subject: Subject,
    /// Optional policy expression, e.g. `geo == "us"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// Consistency token returned when the warrant was written.
    #[serde(default, skip_serializing)]
    pub warrant_token: Option<WarrantToken>,
}

impl Warrant {
    /// Creates a new warrant.
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
            policy: None,
            warrant_token: None,
        }
    }

    /// Attaches a policy expression.
    #[must_use]
    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Returns the object side as a reference.
    pub fn object(&self) -> ObjectRef {
        ObjectRef::new(self.object_type.clone(), self.object_id.clone())
    }

    /// Returns `true` if both warrants describe the same tuple, ignoring
    /// policy and token.
    pub fn same_tuple(&self, other: &Warrant) -> bool {
        self.object_type == other.object_type
            && self.object_id == other.object_id
            && self.relation == other.relation
            && self.subject == other.subject
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        crate::types::object::require_non_empty("object type", &self.object_type)?;
        crate::types::object::require_non_empty("object id", &self.object_id)?;
        crate::types::object::require_non_empty("relation", &self.relation)?;
        crate::types::object::require_non_empty("subject type", &self.subject.object_type)?;
        crate::types::object::require_non_empty("subject id", &self.subject.object_id)
    }
}

impl fmt::Display for Warrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}#{}@{}",
            self.object_type, self.object_id, self.relation, self.subject
        )?;
        if let Some(ref policy) = self.policy {
            write!(f, "[{}]", policy)?;
        }
        Ok(())
    }
}

impl FromStr for Warrant {
    type Err = Error;

    /// Parses `type:id#relation@stype:sid[#srel][[policy]]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            Error::invalid_argument(format!(
                "invalid warrant {:?}: expected type:id#relation@subject_type:subject_id",
                s
            ))
        };

        let (object_part, rest) = s.split_once('#').ok_or_else(invalid)?;
        let (relation, subject_part) = rest.split_once('@').ok_or_else(invalid)?;
        if relation.is_empty() {
            return Err(invalid());
        }

        let (subject_part, policy) = match subject_part.split_once('[') {
            Some((subject, policy)) => {
                let policy = policy.strip_suffix(']').ok_or_else(invalid)?;
                (subject, Some(policy.to_owned()))
            }
            None => (subject_part, None),
        };

        let object: ObjectRef = object_part.parse().map_err(|_| invalid())?;
        let subject: Subject = subject_part.parse().map_err(|_| invalid())?;

        let mut warrant = Warrant::new(object.object_type, object.object_id, relation, subject);
        warrant.policy = policy;
        Ok(warrant)
    }
}
