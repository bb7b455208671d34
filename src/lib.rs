//! toolenv: dependency resolution for tool environments
//!
//! A library that resolves abstract, named/versioned software requirements
//! declared by a consumer (a "tool") into concrete, activatable environment
//! bindings by probing an ordered chain of pluggable resolver backends, and
//! optionally caches bulk-resolved environments under a content-derived key
//! so repeated resolutions of an identical dependency set avoid rebuilding.
//!
//! # Architecture Overview
//!
//! toolenv is built around two layers:
//!
//! - The **resolution chain** ([`manager::DependencyManager`]) walks a fixed,
//!   ordered resolver list and produces an ordered requirement-to-dependency
//!   mapping. Resolution is partial (unanswered requirements are simply
//!   absent), shortcutting (the walk stops once everything is mapped), and
//!   supports bulk all-or-nothing passes and exactness constraints.
//! - The **dependency cache** ([`cache::CachedDependencyManager`]) hashes the
//!   resolved, cacheable dependency set into an 8-character key, builds the
//!   keyed directory idempotently (with forced rebuild support), and binds
//!   the shared cache path into cacheable dependencies before activation
//!   commands are generated.
//!
//! Everything this crate consumes from the outside (concrete resolvers, the
//! dependencies they produce, and consumer objects) is expressed as traits
//! in [`resolvers`] and [`manager`]. The crate never installs software,
//! parses resolver configuration files, or executes the activation commands
//! it returns.
//!
//! # Core Modules
//!
//! - [`requirement`] - Requirement value types ([`ToolRequirement`],
//!   [`RequirementType`])
//! - [`resolvers`] - Resolver and dependency capability contracts
//! - [`manager`] - The resolution chain and its ordered result mapping
//! - [`cache`] - Content-addressed environment caching
//! - [`config`] - Consumer-facing configuration
//! - [`core`] - Error types
//!
//! # Resolution at a glance
//!
//! ```text
//! requirements ──▶ DependencyManager ──▶ ResolutionSet ──▶ activation commands
//!                    │  ordered resolver chain
//!                    │  (bulk pass, then per-requirement)
//!                    ▼
//!                  CachedDependencyManager
//!                    hash(cacheable set) ──▶ cache_root/<8-char key>/
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use toolenv::cache::CachedDependencyManager;
//! use toolenv::config::DependencyConfig;
//! use toolenv::requirement::ToolRequirement;
//! use toolenv::resolvers::{DependencyResolver, ResolveOptions};
//!
//! # fn resolver_chain() -> Vec<Box<dyn DependencyResolver>> { Vec::new() }
//! # fn main() -> anyhow::Result<()> {
//! let config = DependencyConfig::new("/opt/tool_deps", "/opt/tool_deps/_cache");
//! let manager = CachedDependencyManager::new(&config, resolver_chain());
//!
//! let requirements = [ToolRequirement::package("samtools", Some("1.3"))];
//! let commands = manager.activation_commands(&requirements, &ResolveOptions::default())?;
//! for command_sequence in commands {
//!     for command in command_sequence {
//!         println!("{command}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod manager;
pub mod requirement;
pub mod resolvers;

pub use crate::cache::CachedDependencyManager;
pub use crate::config::DependencyConfig;
pub use crate::core::ToolenvError;
pub use crate::manager::{DependencyConsumer, DependencyManager, ResolutionSet};
pub use crate::requirement::{RequirementType, ToolRequirement};
pub use crate::resolvers::{
    Dependency, DependencyResolver, DependencySummary, InstallAll, InstallTarget, MultiResolve,
    ResolveOptions, Resolution,
};
