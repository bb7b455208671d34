//! Tool requirement value types.
//!
//! A [`ToolRequirement`] is the declarative input to dependency resolution: a
//! named, optionally versioned capability request of a given
//! [`RequirementType`]. Requirements are plain immutable values created by the
//! consumer, compared and hashed by their full field tuple, and used as keys
//! in the ordered resolution mapping. Two requirements with identical fields
//! are interchangeable.
//!
//! Only `package` and `set_environment` requirements participate in
//! resolution; any other type is logged and dropped by the manager before the
//! resolver chain runs.
//!
//! # Examples
//!
//! ```rust
//! use toolenv::requirement::{RequirementType, ToolRequirement};
//!
//! let samtools = ToolRequirement::package("samtools", Some("1.3"));
//! assert_eq!(samtools.name, "samtools");
//! assert_eq!(samtools.version.as_deref(), Some("1.3"));
//! assert!(samtools.requirement_type.is_resolvable());
//!
//! let docker = ToolRequirement::new("docker", None::<&str>, RequirementType::Other("container".into()));
//! assert!(!docker.requirement_type.is_resolvable());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag of a [`ToolRequirement`].
///
/// Only [`Package`](RequirementType::Package) and
/// [`SetEnvironment`](RequirementType::SetEnvironment) requirements are
/// resolvable; every other tag round-trips through
/// [`Other`](RequirementType::Other) so unknown types survive
/// serialization without being silently collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequirementType {
    /// A named software package, e.g. `samtools` at version `1.3`.
    Package,
    /// A request to inject environment variables rather than software.
    SetEnvironment,
    /// Any other requirement type; excluded from resolution.
    Other(String),
}

impl RequirementType {
    /// Whether requirements of this type participate in resolution.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        matches!(self, Self::Package | Self::SetEnvironment)
    }

    /// The wire-format string for this type tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Package => "package",
            Self::SetEnvironment => "set_environment",
            Self::Other(other) => other,
        }
    }
}

impl Default for RequirementType {
    fn default() -> Self {
        Self::Package
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RequirementType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "package" => Self::Package,
            "set_environment" => Self::SetEnvironment,
            _ => Self::Other(value),
        }
    }
}

impl From<RequirementType> for String {
    fn from(value: RequirementType) -> Self {
        value.as_str().to_string()
    }
}

/// A named, optionally versioned capability request.
///
/// Identity is the full `(name, version, type)` tuple: the derived
/// `PartialEq`/`Eq`/`Hash` make equal-field requirements interchangeable as
/// mapping keys, which the resolution algorithm relies on when it re-orders
/// its result into input-requirement order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolRequirement {
    /// Requested capability name, e.g. `samtools`.
    pub name: String,
    /// Requested version; `None` asks for whatever the resolver considers
    /// best available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Category tag; defaults to `package` when absent from serialized input.
    #[serde(rename = "type", default)]
    pub requirement_type: RequirementType,
}

impl ToolRequirement {
    /// Creates a requirement with an explicit type tag.
    pub fn new(
        name: impl Into<String>,
        version: Option<impl Into<String>>,
        requirement_type: RequirementType,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.map(Into::into),
            requirement_type,
        }
    }

    /// Creates a `package` requirement.
    pub fn package(name: impl Into<String>, version: Option<impl Into<String>>) -> Self {
        Self::new(name, version, RequirementType::Package)
    }

    /// Creates a `set_environment` requirement.
    pub fn set_environment(name: impl Into<String>) -> Self {
        Self::new(name, None::<String>, RequirementType::SetEnvironment)
    }
}

impl fmt::Display for ToolRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {} ({})", self.name, version, self.requirement_type),
            None => write!(f, "{} ({})", self.name, self.requirement_type),
        }
    }
}
