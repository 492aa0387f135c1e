//! Wire types for the Management API resources cfm touches.
//!
//! Only the fields the deploy step reads or writes are modelled. Every
//! resource carries a `sys` block whose `version` is required for updates
//! (optimistic locking).

use cfm_core::EnvironmentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// `sys` block of a link object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSys {
    #[serde(rename = "type", default = "default_link_type")]
    pub kind: String,

    #[serde(rename = "linkType", default)]
    pub link_type: String,

    pub id: String,
}

fn default_link_type() -> String {
    "Link".to_string()
}

/// A reference to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

impl Link {
    /// A link to an environment, as stored in API key access lists and aliases.
    pub fn environment(id: &EnvironmentId) -> Self {
        Self {
            sys: LinkSys {
                kind: default_link_type(),
                link_type: "Environment".to_string(),
                id: id.to_string(),
            },
        }
    }

    /// Id of the linked resource.
    pub fn id(&self) -> &str {
        &self.sys.id
    }
}

/// `sys` block of a top-level resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSys {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    #[serde(
        rename = "publishedVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub published_version: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Link>,
}

impl ResourceSys {
    /// A bare `sys` block with an id and version.
    pub fn new(id: impl Into<String>, version: u64) -> Self {
        Self {
            id: id.into(),
            version: Some(version),
            published_version: None,
            status: None,
        }
    }
}

/// Processing state of an environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentStatus {
    Queued,
    Ready,
    Failed,
    Other(String),
}

impl EnvironmentStatus {
    /// Parse the status link id reported by the platform.
    pub fn from_id(id: &str) -> Self {
        match id {
            "queued" => EnvironmentStatus::Queued,
            "ready" => EnvironmentStatus::Ready,
            "failed" => EnvironmentStatus::Failed,
            other => EnvironmentStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EnvironmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentStatus::Queued => write!(f, "queued"),
            EnvironmentStatus::Ready => write!(f, "ready"),
            EnvironmentStatus::Failed => write!(f, "failed"),
            EnvironmentStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// An environment of the space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub sys: ResourceSys,

    #[serde(default)]
    pub name: String,
}

impl Environment {
    /// Processing status; an environment without one is still queued.
    pub fn status(&self) -> EnvironmentStatus {
        self.sys
            .status
            .as_ref()
            .map(|link| EnvironmentStatus::from_id(link.id()))
            .unwrap_or(EnvironmentStatus::Queued)
    }
}

/// A delivery API key and the environments it may read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub sys: ResourceSys,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub environments: Vec<Link>,
}

impl ApiKey {
    /// Grant access to an environment. Returns `false` when the key already
    /// had access and nothing changed.
    pub fn grant_environment(&mut self, id: &EnvironmentId) -> bool {
        if self.environments.iter().any(|link| link.id() == id.as_str()) {
            return false;
        }
        self.environments.push(Link::environment(id));
        true
    }
}

/// A locale of an environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub code: String,

    #[serde(default)]
    pub default: bool,
}

/// Localized entry fields: field id -> locale code -> value
pub type EntryFields = BTreeMap<String, BTreeMap<String, Value>>;

/// A content entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub sys: ResourceSys,

    #[serde(default)]
    pub fields: EntryFields,
}

impl Entry {
    /// String value of a localized field.
    pub fn localized_str(&self, field: &str, locale: &str) -> Option<&str> {
        self.fields.get(field)?.get(locale)?.as_str()
    }

    /// Set a localized field value, creating the field if needed.
    pub fn set_localized(&mut self, field: &str, locale: &str, value: impl Into<Value>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .insert(locale.to_string(), value.into());
    }
}

/// A named, repointable environment alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentAlias {
    pub sys: ResourceSys,

    pub environment: Link,
}

/// A page of a collection endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    #[serde(default)]
    pub total: usize,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
