//! Shared test doubles for the integration suites.
//!
//! Stub resolvers and dependencies standing in for the external backends the
//! crate consumes: a table-driven single resolver, a bulk resolver, and a
//! cacheable dependency that materializes `env.sh` scripts into cache
//! entries.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use toolenv::requirement::ToolRequirement;
use toolenv::resolvers::{
    Dependency, DependencyResolver, MultiResolve, ResolveOptions, Resolution,
};

/// Dependency test double with a configurable identity tuple.
///
/// Unbound, it activates from a fixed base layout; once a cache path is
/// bound, activation sources `env.sh` from the shared cache entry instead.
#[derive(Clone)]
pub struct StubDependency {
    pub name: String,
    pub version: Option<String>,
    pub exact: bool,
    pub dependency_type: String,
    pub cacheable: bool,
    pub cache_path: Option<PathBuf>,
}

impl StubDependency {
    pub fn new(name: &str, version: Option<&str>, exact: bool, dependency_type: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.map(str::to_string),
            exact,
            dependency_type: dependency_type.to_string(),
            cacheable: false,
            cache_path: None,
        }
    }

    pub fn cacheable(mut self) -> Self {
        self.cacheable = true;
        self
    }
}

impl Dependency for StubDependency {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn exact(&self) -> bool {
        self.exact
    }

    fn dependency_type(&self) -> &str {
        &self.dependency_type
    }

    fn cacheable(&self) -> bool {
        self.cacheable
    }

    fn activation_commands(&self, _requirement: &ToolRequirement) -> Vec<String> {
        match &self.cache_path {
            Some(cache_path) => {
                vec![format!("source {}/{}/env.sh", cache_path.display(), self.name)]
            }
            None => vec![format!(
                "source /opt/tool_deps/{}/{}/env.sh",
                self.name,
                self.version.as_deref().unwrap_or("default")
            )],
        }
    }

    fn materialize_into(&self, cache_dir: &Path) -> Result<()> {
        let entry = cache_dir.join(&self.name);
        fs::create_dir_all(&entry)?;
        fs::write(
            entry.join("env.sh"),
            format!(
                "export PATH={}/{}/bin:$PATH\n",
                cache_dir.display(),
                self.name
            ),
        )?;
        Ok(())
    }

    fn bind_cache_path(&mut self, cache_dir: &Path) {
        self.cache_path = Some(cache_dir.to_path_buf());
    }
}

/// Resolver answering single requirements from a fixed name table.
pub struct TableResolver {
    resolver_type: String,
    answers: HashMap<String, StubDependency>,
}

impl TableResolver {
    pub fn new(resolver_type: &str) -> Self {
        Self {
            resolver_type: resolver_type.to_string(),
            answers: HashMap::new(),
        }
    }

    pub fn with(mut self, dependency: StubDependency) -> Self {
        self.answers.insert(dependency.name.clone(), dependency);
        self
    }
}

impl DependencyResolver for TableResolver {
    fn resolver_type(&self) -> &str {
        &self.resolver_type
    }

    fn resolve(&self, requirement: &ToolRequirement, _options: &ResolveOptions) -> Resolution {
        match self.answers.get(&requirement.name) {
            Some(dependency) => Resolution::Resolved(Box::new(dependency.clone())),
            None => Resolution::unresolved_for(requirement),
        }
    }
}

/// Bulk resolver answering every requirement with one backend type.
///
/// `extra_answers` pads the response past the input length to exercise the
/// all-or-nothing count contract.
pub struct BulkResolver {
    pub dependency_type: String,
    pub cacheable: bool,
    pub extra_answers: usize,
}

impl BulkResolver {
    pub fn new(dependency_type: &str) -> Self {
        Self {
            dependency_type: dependency_type.to_string(),
            cacheable: false,
            extra_answers: 0,
        }
    }

    pub fn cacheable(mut self) -> Self {
        self.cacheable = true;
        self
    }

    fn answer(&self, requirement: &ToolRequirement) -> StubDependency {
        let mut dependency = StubDependency::new(
            &requirement.name,
            requirement.version.as_deref(),
            true,
            &self.dependency_type,
        );
        dependency.cacheable = self.cacheable;
        dependency
    }
}

impl DependencyResolver for BulkResolver {
    fn resolver_type(&self) -> &str {
        &self.dependency_type
    }

    fn resolve(&self, requirement: &ToolRequirement, _options: &ResolveOptions) -> Resolution {
        Resolution::Resolved(Box::new(self.answer(requirement)))
    }

    fn as_multi(&self) -> Option<&dyn MultiResolve> {
        Some(self)
    }
}

impl MultiResolve for BulkResolver {
    fn resolve_all(
        &self,
        requirements: &[ToolRequirement],
        _options: &ResolveOptions,
    ) -> Option<Vec<Box<dyn Dependency>>> {
        let mut answers: Vec<Box<dyn Dependency>> = requirements
            .iter()
            .map(|requirement| Box::new(self.answer(requirement)) as Box<dyn Dependency>)
            .collect();
        for _ in 0..self.extra_answers {
            answers.push(Box::new(StubDependency::new("padding", None, true, &self.dependency_type)));
        }
        Some(answers)
    }
}
