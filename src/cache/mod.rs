//! Content-addressed caching for resolved dependency environments.
//!
//! [`CachedDependencyManager`] layers a directory lifecycle on top of the
//! resolution chain so repeated resolutions of an identical dependency set
//! reuse one prebuilt environment instead of rebuilding it.
//!
//! # Cache keying
//!
//! Every cache entry is a top-level directory under the configured cache
//! root, named by the first 8 hex characters of a SHA-256 digest over the
//! *sorted* `(name, version, exact, dependency_type)` tuples of the
//! cacheable dependencies it represents. Sorting before hashing makes the
//! key a pure, order-independent function of the dependency identity set:
//! permuting the input, or recomputing in another process, yields the same
//! key. Non-cacheable dependencies never influence the key.
//!
//! # Entry lifecycle
//!
//! ```text
//! Absent ──build_cache──▶ Building ──▶ Present
//!    ▲                        │
//!    └──── failure leaves absent or partially removed, never Present
//! ```
//!
//! [`build_cache`](CachedDependencyManager::build_cache) is idempotent: an
//! existing entry is left untouched unless `force_rebuild` is set, in which
//! case the entry is recursively deleted first (a deletion failure is logged
//! and propagated, never swallowed).
//!
//! # Concurrency
//!
//! The cache root is a shared, unsynchronized filesystem resource. Two
//! callers computing the same key may both observe "absent" and both attempt
//! a build; this layer provides no locking to prevent that race. Everything
//! here runs synchronously on the calling thread.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::DependencyConfig;
use crate::core::ToolenvError;
use crate::manager::DependencyManager;
use crate::requirement::ToolRequirement;
use crate::resolvers::{Dependency, DependencyResolver, ResolveOptions};

/// A [`DependencyManager`] with a content-addressed environment cache.
///
/// Resolution behavior is identical to the wrapped manager; the cache only
/// changes where cacheable dependencies generate their activation commands
/// from, and builds that shared location on demand.
pub struct CachedDependencyManager {
    manager: DependencyManager,
    cache_dir: PathBuf,
    precache: bool,
}

impl CachedDependencyManager {
    /// Creates a cached manager over a pre-ordered resolver list.
    ///
    /// The cache root is normalized to an absolute path but not created;
    /// dependency materialization creates entries on demand.
    pub fn new(config: &DependencyConfig, resolvers: Vec<Box<dyn DependencyResolver>>) -> Self {
        let cache_dir =
            std::path::absolute(&config.cache_dir).unwrap_or_else(|_| config.cache_dir.clone());
        Self {
            manager: DependencyManager::new(config, resolvers),
            cache_dir,
            precache: config.precache,
        }
    }

    /// The wrapped resolution chain.
    #[must_use]
    pub fn manager(&self) -> &DependencyManager {
        &self.manager
    }

    /// Absolute cache root directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Computes the 8-character cache key for a dependency set.
    ///
    /// Pure function of the cacheable dependencies' identity tuples; no
    /// filesystem access. Non-cacheable dependencies are filtered out, and
    /// the tuples are sorted before hashing so the key is invariant under
    /// permutation of the input.
    #[must_use]
    pub fn hash_dependencies(dependencies: &[&dyn Dependency]) -> String {
        let mut identities: Vec<(String, Option<String>, bool, String)> = dependencies
            .iter()
            .filter(|dependency| dependency.cacheable())
            .map(|dependency| {
                (
                    dependency.name().to_string(),
                    dependency.version().map(str::to_string),
                    dependency.exact(),
                    dependency.dependency_type().to_string(),
                )
            })
            .collect();
        identities.sort();

        let serialized = serde_json::to_string(&identities)
            .expect("dependency identity tuples serialize to JSON");
        let mut hasher = Sha256::new();
        hasher.update(serialized.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..8].to_string()
    }

    /// The cache entry path for a dependency set.
    ///
    /// Pure; joins the cache root with
    /// [`hash_dependencies`](Self::hash_dependencies) without touching the
    /// filesystem.
    #[must_use]
    pub fn cache_path(&self, dependencies: &[&dyn Dependency]) -> PathBuf {
        self.cache_dir.join(Self::hash_dependencies(dependencies))
    }

    /// Resolves `requirements` and builds the cache entry for the cacheable
    /// subset.
    ///
    /// If the entry already exists the build is an idempotent no-op unless
    /// `force_rebuild` is set, in which case the entry is recursively
    /// deleted and rebuilt. Each cacheable dependency materializes itself
    /// into the entry in mapping order.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures, a failed forced deletion
    /// ([`ToolenvError::CacheRemoval`]), and any materialization failure.
    /// A failed build leaves the entry absent or partial, never reported
    /// as built.
    pub fn build_cache(
        &self,
        requirements: &[ToolRequirement],
        options: &ResolveOptions,
        force_rebuild: bool,
    ) -> Result<()> {
        let resolution = self.manager.resolve(requirements, options)?;
        let cacheable: Vec<&dyn Dependency> = resolution
            .dependencies()
            .filter(|dependency| dependency.cacheable())
            .collect();
        let cache_path = self.cache_path(&cacheable);

        if cache_path.exists() {
            if force_rebuild {
                if let Err(source) = fs::remove_dir_all(&cache_path) {
                    warn!(
                        path = %cache_path.display(),
                        "could not delete cached environment directory"
                    );
                    return Err(ToolenvError::CacheRemoval {
                        path: cache_path,
                        source,
                    }
                    .into());
                }
            } else {
                debug!(
                    path = %cache_path.display(),
                    "cached environment directory already exists, skipping build"
                );
                return Ok(());
            }
        }

        for dependency in cacheable {
            dependency.materialize_into(&cache_path).with_context(|| {
                format!(
                    "failed to materialize '{}' into cache entry '{}'",
                    dependency.name(),
                    cache_path.display()
                )
            })?;
        }
        Ok(())
    }

    /// Resolves `requirements` and returns activation commands, routing
    /// cacheable dependencies through the shared cache entry.
    ///
    /// When the entry is absent and the config enables pre-caching it is
    /// built as a side effect. When the entry is present (pre-existing or
    /// just built), every cacheable dependency is re-bound to it before
    /// command generation; non-cacheable dependencies generate their
    /// commands normally, uninfluenced by the cache.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures and cache-build failures.
    pub fn activation_commands(
        &self,
        requirements: &[ToolRequirement],
        options: &ResolveOptions,
    ) -> Result<Vec<Vec<String>>> {
        let mut resolution = self.manager.resolve(requirements, options)?;
        let cache_path = {
            let cacheable: Vec<&dyn Dependency> = resolution
                .dependencies()
                .filter(|dependency| dependency.cacheable())
                .collect();
            self.cache_path(&cacheable)
        };

        if !cache_path.exists() && self.precache {
            self.build_cache(requirements, options, false)?;
        }
        if cache_path.exists() {
            for dependency in resolution.dependencies_mut() {
                if dependency.cacheable() {
                    dependency.bind_cache_path(&cache_path);
                }
            }
        }
        Ok(resolution.activation_commands())
    }
}
