//! The resolution chain: ordered, partial, shortcutting requirement
//! resolution.
//!
//! This module implements the algorithm that turns a list of
//! [`ToolRequirement`]s into an ordered mapping of requirements to concrete
//! [`Dependency`] bindings by probing a fixed chain of resolver backends.
//!
//! # Resolution algorithm
//!
//! [`DependencyManager::resolve`] proceeds in three stages:
//!
//! 1. **Partition**: requirements whose type is not resolvable (`package` or
//!    `set_environment`) are logged at debug level and dropped; they never
//!    appear in the output mapping.
//! 2. **Chain walk**: resolvers are consulted strictly in construction
//!    order. The walk carries an explicit reduction state, the growing
//!    result map plus a shrinking pending list, so the "everything is
//!    resolved" shortcut is an O(1) emptiness check rather than a scan.
//!    For each resolver:
//!    - If nothing has been resolved yet and the resolver supports bulk
//!      resolution, the full resolvable list is offered in one positional,
//!      all-or-nothing call. A non-empty answer must match the input length
//!      exactly (anything else is a fatal contract violation), claims every
//!      requirement, and ends the walk.
//!    - Otherwise each still-pending requirement is resolved individually.
//!      Inexact answers are discarded under `exact_only` and the requirement
//!      stays open for later resolvers. Once a requirement is resolved it is
//!      never reconsidered by a later resolver.
//! 3. **Seal**: the accumulated entries are re-ordered into input-requirement
//!    order, which is the iteration order the returned [`ResolutionSet`]
//!    guarantees.
//!
//! A requirement no resolver answers is simply absent from the result; that
//! is an expected outcome, not an error.
//!
//! # Example
//!
//! ```rust
//! use toolenv::config::DependencyConfig;
//! use toolenv::manager::DependencyManager;
//! use toolenv::requirement::ToolRequirement;
//! use toolenv::resolvers::{
//!     Dependency, DependencyResolver, ResolveOptions, Resolution,
//! };
//!
//! struct EchoDependency(String);
//!
//! impl Dependency for EchoDependency {
//!     fn name(&self) -> &str {
//!         &self.0
//!     }
//!     fn version(&self) -> Option<&str> {
//!         None
//!     }
//!     fn exact(&self) -> bool {
//!         true
//!     }
//!     fn dependency_type(&self) -> &str {
//!         "echo"
//!     }
//!     fn activation_commands(&self, _requirement: &ToolRequirement) -> Vec<String> {
//!         vec![format!("echo {}", self.0)]
//!     }
//! }
//!
//! struct EchoResolver;
//!
//! impl DependencyResolver for EchoResolver {
//!     fn resolver_type(&self) -> &str {
//!         "echo"
//!     }
//!     fn resolve(&self, requirement: &ToolRequirement, _options: &ResolveOptions) -> Resolution {
//!         Resolution::Resolved(Box::new(EchoDependency(requirement.name.clone())))
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = DependencyConfig::new("/opt/deps", "/opt/deps/_cache");
//! let manager = DependencyManager::new(&config, vec![Box::new(EchoResolver)]);
//! let requirements = [ToolRequirement::package("samtools", Some("1.3"))];
//! let commands = manager.activation_commands(&requirements, &ResolveOptions::default())?;
//! assert_eq!(commands, vec![vec!["echo samtools".to_string()]]);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::DependencyConfig;
use crate::core::ToolenvError;
use crate::requirement::{RequirementType, ToolRequirement};
use crate::resolvers::{
    Dependency, DependencyResolver, DependencySummary, ResolveOptions, Resolution,
};

/// A consumer object that wants the ordered summary list of a resolution
/// assigned onto it.
///
/// Mirrors the pattern of a tool instance caching `dependencies` after its
/// requirements were resolved on its behalf; see
/// [`DependencyManager::resolve_for`].
pub trait DependencyConsumer {
    /// Receives one [`DependencySummary`] per mapped dependency, in mapping
    /// order.
    fn record_dependencies(&mut self, summaries: Vec<DependencySummary>);
}

/// Ordered requirement-to-dependency mapping produced by one resolution
/// call.
///
/// Iteration order is the input-requirement order of the originating
/// [`DependencyManager::resolve`] call. A requirement is present iff some
/// resolver returned a concrete dependency for it; callers must check for
/// absent entries.
pub struct ResolutionSet {
    pub(crate) entries: IndexMap<ToolRequirement, Box<dyn Dependency>>,
}

impl ResolutionSet {
    /// Number of resolved requirements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `requirement` was resolved.
    #[must_use]
    pub fn contains(&self, requirement: &ToolRequirement) -> bool {
        self.entries.contains_key(requirement)
    }

    /// The dependency resolved for `requirement`, if any.
    #[must_use]
    pub fn get(&self, requirement: &ToolRequirement) -> Option<&dyn Dependency> {
        self.entries.get(requirement).map(|dependency| &**dependency)
    }

    /// Iterates `(requirement, dependency)` pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&ToolRequirement, &dyn Dependency)> {
        self.entries
            .iter()
            .map(|(requirement, dependency)| (requirement, &**dependency))
    }

    /// Iterates the resolved dependencies in mapping order.
    pub fn dependencies(&self) -> impl Iterator<Item = &dyn Dependency> {
        self.entries.values().map(|dependency| &**dependency)
    }

    /// Mutable access to the resolved dependencies, used by the cache layer
    /// to bind cache paths.
    pub(crate) fn dependencies_mut<'a>(
        &'a mut self,
    ) -> impl Iterator<Item = &'a mut (dyn Dependency + 'a)> + 'a {
        self.entries
            .values_mut()
            .map(move |dependency| &mut **dependency as &mut dyn Dependency)
    }

    /// One summary per dependency, in mapping order.
    #[must_use]
    pub fn summaries(&self) -> Vec<DependencySummary> {
        self.dependencies().map(|dependency| dependency.to_summary()).collect()
    }

    /// One activation-command sequence per dependency, in mapping order.
    #[must_use]
    pub fn activation_commands(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|(requirement, dependency)| dependency.activation_commands(requirement))
            .collect()
    }
}

impl IntoIterator for ResolutionSet {
    type Item = (ToolRequirement, Box<dyn Dependency>);
    type IntoIter = indexmap::map::IntoIter<ToolRequirement, Box<dyn Dependency>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl std::fmt::Debug for ResolutionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(requirement, dependency)| (requirement, dependency.dependency_type())),
            )
            .finish()
    }
}

/// Drives an ordered, immutable chain of resolver backends.
///
/// The resolver list is fixed at construction and never re-ordered or
/// mutated per call; the manager holds shared read-only state, so a chain
/// can serve repeated resolutions and be shared across threads (the
/// resolver contracts require `Send + Sync`). Resolution itself is fully
/// synchronous and runs on the calling thread to completion.
pub struct DependencyManager {
    resolvers: Vec<Box<dyn DependencyResolver>>,
    default_base_path: PathBuf,
}

impl DependencyManager {
    /// Creates a manager over a pre-ordered, pre-instantiated resolver list.
    ///
    /// The base path is normalized to an absolute path. A missing or
    /// non-directory base path is logged as a warning and otherwise
    /// tolerated: path-based resolvers will simply find nothing there.
    pub fn new(config: &DependencyConfig, resolvers: Vec<Box<dyn DependencyResolver>>) -> Self {
        let base_path = &config.default_base_path;
        if !base_path.exists() {
            warn!(path = %base_path.display(), "dependency base path does not exist, ignoring");
        } else if !base_path.is_dir() {
            warn!(path = %base_path.display(), "dependency base path is not a directory, ignoring");
        }
        let default_base_path =
            std::path::absolute(base_path).unwrap_or_else(|_| base_path.clone());
        Self {
            resolvers,
            default_base_path,
        }
    }

    /// The resolver chain, in consultation order.
    #[must_use]
    pub fn resolvers(&self) -> &[Box<dyn DependencyResolver>] {
        &self.resolvers
    }

    /// Absolute base path under which path-based resolvers search.
    #[must_use]
    pub fn default_base_path(&self) -> &Path {
        &self.default_base_path
    }

    /// Resolves `requirements` against the chain.
    ///
    /// Returns the ordered requirement-to-dependency mapping described in
    /// the module docs. Requirements of unresolvable types are excluded;
    /// requirements nobody resolves are absent from the mapping.
    ///
    /// # Errors
    ///
    /// Fails only on a bulk-resolution count mismatch
    /// ([`ToolenvError::BulkResolutionMismatch`]); partial resolution is not
    /// an error.
    pub fn resolve(
        &self,
        requirements: &[ToolRequirement],
        options: &ResolveOptions,
    ) -> Result<ResolutionSet> {
        let mut resolvable: Vec<ToolRequirement> = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            if requirement.requirement_type.is_resolvable() {
                resolvable.push(requirement.clone());
            } else {
                debug!(
                    name = %requirement.name,
                    requirement_type = %requirement.requirement_type,
                    "unresolvable requirement type found, will be ignored"
                );
            }
        }

        let mut resolved: IndexMap<ToolRequirement, Box<dyn Dependency>> =
            IndexMap::with_capacity(resolvable.len());
        let mut pending: Vec<ToolRequirement> = resolvable.clone();

        for (index, resolver) in self.resolvers.iter().enumerate() {
            if let Some(only) = options.resolver_index {
                if index != only {
                    continue;
                }
            }

            if pending.is_empty() {
                // Every resolvable requirement is mapped.
                break;
            }

            // A bulk pass is only offered while the mapping is untouched: a
            // bulk resolver claims exclusive, all-or-nothing ownership.
            if resolved.is_empty() {
                if let Some(multi) = resolver.as_multi() {
                    if let Some(dependencies) = multi.resolve_all(&resolvable, options) {
                        if !dependencies.is_empty() {
                            if dependencies.len() != resolvable.len() {
                                return Err(ToolenvError::BulkResolutionMismatch {
                                    resolver: resolver.resolver_type().to_string(),
                                    expected: resolvable.len(),
                                    actual: dependencies.len(),
                                }
                                .into());
                            }
                            for (requirement, dependency) in resolvable.iter().zip(dependencies) {
                                resolved.insert(requirement.clone(), dependency);
                            }
                            pending.clear();
                            break;
                        }
                    }
                }
            }

            pending.retain(|requirement| match resolver.resolve(requirement, options) {
                Resolution::Resolved(dependency) => {
                    if options.exact_only && !dependency.exact() {
                        // Discarded; a later resolver may still answer.
                        return true;
                    }
                    if let Some(message) = dependency.resolver_message() {
                        debug!(resolver = resolver.resolver_type(), "{message}");
                    }
                    resolved.insert(requirement.clone(), dependency);
                    false
                }
                Resolution::Unresolved { .. } => true,
            });
        }

        // Seal the mapping in input-requirement order, not resolver-pass
        // order.
        let mut entries = IndexMap::with_capacity(resolved.len());
        for requirement in resolvable {
            if let Some(dependency) = resolved.shift_remove(&requirement) {
                entries.insert(requirement, dependency);
            }
        }
        Ok(ResolutionSet { entries })
    }

    /// Resolves `requirements` and assigns the ordered summary list onto
    /// `consumer` as a side effect.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`resolve`](Self::resolve).
    pub fn resolve_for(
        &self,
        consumer: &mut dyn DependencyConsumer,
        requirements: &[ToolRequirement],
        options: &ResolveOptions,
    ) -> Result<ResolutionSet> {
        let resolution = self.resolve(requirements, options)?;
        consumer.record_dependencies(resolution.summaries());
        Ok(resolution)
    }

    /// Resolves `requirements` and returns one activation-command sequence
    /// per mapped dependency, in mapping order.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`resolve`](Self::resolve).
    pub fn activation_commands(
        &self,
        requirements: &[ToolRequirement],
        options: &ResolveOptions,
    ) -> Result<Vec<Vec<String>>> {
        Ok(self.resolve(requirements, options)?.activation_commands())
    }

    /// Attempts to install all requirements through the first resolver that
    /// supports installation.
    ///
    /// The full, unfiltered requirement list is handed to that resolver's
    /// target extraction, and its install result is returned directly: there
    /// is no fallback to a second capable resolver. Returns `false` when no
    /// resolver supports installation.
    pub fn install_all(&self, requirements: &[ToolRequirement]) -> bool {
        for resolver in &self.resolvers {
            if let Some(installer) = resolver.as_installer() {
                let targets = installer.install_targets(requirements);
                return installer.install_all(&targets);
            }
        }
        false
    }

    /// Resolves a single requirement.
    ///
    /// Returns [`Resolution::Unresolved`] when no resolver answers.
    ///
    /// # Errors
    ///
    /// Fails on the [`resolve`](Self::resolve) failure modes, and on the
    /// contract violation of a single-requirement resolution somehow
    /// producing multiple entries ([`ToolenvError::AmbiguousResolution`]).
    pub fn find_one(
        &self,
        name: &str,
        version: Option<&str>,
        requirement_type: RequirementType,
        options: &ResolveOptions,
    ) -> Result<Resolution> {
        debug!(name, version = version.unwrap_or("<any>"), "finding dependency");
        let requirement = ToolRequirement::new(name, version, requirement_type);
        let resolution = self.resolve(std::slice::from_ref(&requirement), options)?;
        let mut entries = resolution.entries;
        if entries.len() > 1 {
            return Err(ToolenvError::AmbiguousResolution {
                name: name.to_string(),
                count: entries.len(),
            }
            .into());
        }
        match entries.pop() {
            Some((_, dependency)) => Ok(Resolution::Resolved(dependency)),
            None => Ok(Resolution::unresolved(name, version)),
        }
    }
}
