//! Resolver and dependency capability contracts.
//!
//! This module defines the seams between the resolution chain and the
//! pluggable backends it drives. The chain consumes these traits; it never
//! implements them. Concrete resolvers (conda-backed, directory-backed, and
//! so on) live with their owners and are handed to
//! [`DependencyManager::new`](crate::manager::DependencyManager::new)
//! pre-instantiated, in the order they should be consulted.
//!
//! # Capability model
//!
//! Every resolver implements [`DependencyResolver::resolve`], answering one
//! requirement at a time. Two optional capabilities are exposed through
//! statically typed accessors instead of runtime attribute probing:
//!
//! - [`DependencyResolver::as_multi`]: the resolver can answer an entire
//!   requirement list in one positional, all-or-nothing call
//!   ([`MultiResolve`]).
//! - [`DependencyResolver::as_installer`]: the resolver can extract install
//!   targets from a requirement list and attempt to install them
//!   ([`InstallAll`]).
//!
//! The default accessor implementations return `None`, so a plain resolver
//! opts into nothing extra.
//!
//! All four contracts require `Send + Sync`: the chain holds shared
//! read-only state, and a built chain can be shared across threads.
//!
//! # Resolution outcomes
//!
//! A resolve call always returns a [`Resolution`]: either
//! [`Resolution::Resolved`] carrying a boxed [`Dependency`], or
//! [`Resolution::Unresolved`] carrying only the requested name and version.
//! The tagged variant forces call sites to handle "nothing found" explicitly;
//! there is no null dependency object to accidentally treat as a success.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::requirement::ToolRequirement;

/// Options threaded through every resolve call.
///
/// `resolver_index` and `exact_only` steer the chain algorithm itself;
/// `extra` is an opaque bag of resolver-specific options the chain passes
/// through untouched.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Restrict resolution to the resolver at this chain index, for
    /// diagnostics.
    pub resolver_index: Option<usize>,
    /// Discard inexact answers; requirements stay open for later resolvers.
    pub exact_only: bool,
    /// Resolver-specific passthrough options.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ResolveOptions {
    /// Options that restrict the chain walk to a single resolver index.
    #[must_use]
    pub fn only_resolver(index: usize) -> Self {
        Self {
            resolver_index: Some(index),
            ..Self::default()
        }
    }

    /// Options that accept only exact version matches.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            exact_only: true,
            ..Self::default()
        }
    }
}

/// Serializable snapshot of a resolved dependency.
///
/// This is what gets assigned onto a
/// [`DependencyConsumer`](crate::manager::DependencyConsumer) and what the
/// cache layer hashes a subset of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySummary {
    /// Resolved capability name.
    pub name: String,
    /// Resolved version, if any.
    pub version: Option<String>,
    /// Backend type tag, e.g. `conda` or `package_dir`.
    pub dependency_type: String,
    /// Whether the requested version was matched precisely.
    pub exact: bool,
    /// Whether the environment can be rebuilt under a content-derived key.
    pub cacheable: bool,
}

/// A concrete, activatable binding produced by a resolver.
///
/// The chain owns boxed dependencies for the duration of one resolution
/// call; they have no persistent identity beyond that. Cacheable
/// implementations additionally support being materialized into, and later
/// re-bound to, a shared cache directory.
pub trait Dependency: Send + Sync {
    /// Resolved capability name.
    fn name(&self) -> &str;

    /// Resolved version, if any.
    fn version(&self) -> Option<&str>;

    /// Whether the requested version was matched precisely rather than
    /// falling back to best-available.
    fn exact(&self) -> bool;

    /// Backend type tag, e.g. `conda`.
    fn dependency_type(&self) -> &str;

    /// Whether this dependency's environment can be built once under a
    /// content-derived key and reused.
    fn cacheable(&self) -> bool {
        false
    }

    /// Human-readable note from the resolver about how this answer was
    /// found; logged at debug level by the chain.
    fn resolver_message(&self) -> Option<String> {
        None
    }

    /// Shell commands that make this dependency available in the consumer's
    /// environment.
    fn activation_commands(&self, requirement: &ToolRequirement) -> Vec<String>;

    /// Serializable snapshot of this dependency.
    fn to_summary(&self) -> DependencySummary {
        DependencySummary {
            name: self.name().to_string(),
            version: self.version().map(str::to_string),
            dependency_type: self.dependency_type().to_string(),
            exact: self.exact(),
            cacheable: self.cacheable(),
        }
    }

    /// Builds this dependency's environment inside `cache_dir`.
    ///
    /// Only meaningful when [`cacheable`](Dependency::cacheable) returns
    /// `true`; the default is a no-op so non-cacheable implementations need
    /// not override it.
    fn materialize_into(&self, cache_dir: &Path) -> Result<()> {
        let _ = cache_dir;
        Ok(())
    }

    /// Points activation-command generation at a shared cache directory
    /// instead of the dependency's ad hoc location.
    fn bind_cache_path(&mut self, cache_dir: &Path) {
        let _ = cache_dir;
    }
}

/// Outcome of resolving one requirement.
pub enum Resolution {
    /// No resolver produced a binding; carries the requested identity so
    /// callers can still report what was asked for.
    Unresolved {
        /// Requested capability name.
        name: String,
        /// Requested version, if any.
        version: Option<String>,
    },
    /// A resolver produced a concrete binding.
    Resolved(Box<dyn Dependency>),
}

impl Resolution {
    /// An unresolved sentinel for the given identity.
    pub fn unresolved(name: impl Into<String>, version: Option<&str>) -> Self {
        Self::Unresolved {
            name: name.into(),
            version: version.map(str::to_string),
        }
    }

    /// An unresolved sentinel carrying `requirement`'s identity.
    #[must_use]
    pub fn unresolved_for(requirement: &ToolRequirement) -> Self {
        Self::unresolved(requirement.name.clone(), requirement.version.as_deref())
    }

    /// Whether this resolution carries a concrete dependency.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Borrows the resolved dependency, if any.
    #[must_use]
    pub fn dependency(&self) -> Option<&dyn Dependency> {
        match self {
            Self::Resolved(dependency) => Some(dependency.as_ref()),
            Self::Unresolved { .. } => None,
        }
    }

    /// Takes ownership of the resolved dependency, if any.
    #[must_use]
    pub fn into_dependency(self) -> Option<Box<dyn Dependency>> {
        match self {
            Self::Resolved(dependency) => Some(dependency),
            Self::Unresolved { .. } => None,
        }
    }

    /// Activation commands for this resolution; always empty for the
    /// unresolved sentinel.
    pub fn activation_commands(&self, requirement: &ToolRequirement) -> Vec<String> {
        match self {
            Self::Resolved(dependency) => dependency.activation_commands(requirement),
            Self::Unresolved { .. } => Vec::new(),
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved { name, version } => f
                .debug_struct("Unresolved")
                .field("name", name)
                .field("version", version)
                .finish(),
            Self::Resolved(dependency) => f
                .debug_struct("Resolved")
                .field("name", &dependency.name())
                .field("version", &dependency.version())
                .field("dependency_type", &dependency.dependency_type())
                .field("exact", &dependency.exact())
                .finish(),
        }
    }
}

/// A pluggable resolution backend.
///
/// Resolvers are constructed externally, handed to the chain in a fixed
/// order, and never mutated by it. A resolver is consulted for one
/// requirement at a time through [`resolve`](DependencyResolver::resolve);
/// the optional capability accessors let the chain discover bulk resolution
/// and installation support without downcasting.
pub trait DependencyResolver: Send + Sync {
    /// Short type tag used in logs and error messages, e.g. `conda`.
    fn resolver_type(&self) -> &str;

    /// Attempts to resolve one requirement.
    ///
    /// Returning [`Resolution::Unresolved`] is the normal "not mine" answer;
    /// the chain moves on to the next resolver.
    fn resolve(&self, requirement: &ToolRequirement, options: &ResolveOptions) -> Resolution;

    /// Bulk-resolution capability, if this resolver supports it.
    fn as_multi(&self) -> Option<&dyn MultiResolve> {
        None
    }

    /// Installation capability, if this resolver supports it.
    fn as_installer(&self) -> Option<&dyn InstallAll> {
        None
    }
}

/// Optional capability: answer an entire requirement list in one call.
///
/// Bulk resolution is positional and all-or-nothing. Returning `None` or an
/// empty vector declines the pass; returning a non-empty vector claims every
/// requirement, and its length must equal the input length; the chain
/// treats any mismatch as a fatal contract violation rather than zipping a
/// partial answer.
pub trait MultiResolve: Send + Sync {
    /// Resolves `requirements` positionally, or declines.
    fn resolve_all(
        &self,
        requirements: &[ToolRequirement],
        options: &ResolveOptions,
    ) -> Option<Vec<Box<dyn Dependency>>>;
}

/// A unit of work for a resolver's bulk installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallTarget {
    /// Package name to install.
    pub name: String,
    /// Version to install, if pinned.
    pub version: Option<String>,
}

impl InstallTarget {
    /// A target for `name` at an optional pinned version.
    pub fn new(name: impl Into<String>, version: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            version: version.map(Into::into),
        }
    }
}

/// Optional capability pair: extract install targets and install them.
///
/// The two methods are only ever used together; the chain hands the targets
/// from [`install_targets`](InstallAll::install_targets) straight to
/// [`install_all`](InstallAll::install_all) on the same resolver.
pub trait InstallAll: Send + Sync {
    /// Computes install targets from the full, unfiltered requirement list.
    fn install_targets(&self, requirements: &[ToolRequirement]) -> Vec<InstallTarget>;

    /// Attempts to install every target; `true` on success.
    fn install_all(&self, targets: &[InstallTarget]) -> bool;
}
