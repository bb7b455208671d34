//! Consumer-facing configuration for dependency management.
//!
//! A [`DependencyConfig`] carries the three settings the resolution chain and
//! the dependency cache need from their embedder: where path-based resolvers
//! look for per-dependency directories, where cached environments live, and
//! whether missing cache entries are built automatically during activation.
//!
//! Resolver instantiation and configuration-file parsing are deliberately
//! not handled here; the embedder constructs resolvers itself and hands them
//! to [`DependencyManager::new`](crate::manager::DependencyManager::new)
//! alongside this config. The struct derives serde so embedders that keep
//! their settings in a serialized config can deserialize it directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_precache() -> bool {
    true
}

/// Settings shared by [`DependencyManager`](crate::manager::DependencyManager)
/// and [`CachedDependencyManager`](crate::cache::CachedDependencyManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    /// Base directory path-based resolvers search for dependencies, laid out
    /// as `$BASE/<name>/<version>/`. A missing or non-directory path is a
    /// warning, not an error; such resolvers simply find nothing.
    pub default_base_path: PathBuf,

    /// Root directory for cached environments. Each entry is a top-level
    /// subdirectory named by the 8-character hash of the dependency set it
    /// holds.
    pub cache_dir: PathBuf,

    /// Build missing cache entries automatically when activation commands
    /// are requested through the cached manager. Defaults to `true`.
    #[serde(default = "default_precache")]
    pub precache: bool,
}

impl DependencyConfig {
    /// Config with automatic pre-caching enabled.
    pub fn new(default_base_path: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            default_base_path: default_base_path.into(),
            cache_dir: cache_dir.into(),
            precache: true,
        }
    }

    /// Disables automatic pre-caching.
    #[must_use]
    pub fn without_precache(mut self) -> Self {
        self.precache = false;
        self
    }
}
