//! Resolve - per-module dependency queries over a frozen registry.
//!
//! A ModuleResolver only borrows the registry. Every query is a pure read,
//! so one resolver (or many) can be used from any number of threads.

use std::collections::HashSet;

use crate::core::{ModuleDefinition, ModuleRegistry, Visibility};
use crate::resolver::errors::{similar_names, ResolveError};
use crate::resolver::graph::{ModuleGraph, UnknownPolicy};

/// Answers dependency questions about single modules.
#[derive(Debug, Clone, Copy)]
pub struct ModuleResolver<'a> {
    registry: &'a ModuleRegistry,
}

impl<'a> ModuleResolver<'a> {
    /// Create a resolver over a registry.
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        ModuleResolver { registry }
    }

    /// The registry being queried.
    pub fn registry(&self) -> &'a ModuleRegistry {
        self.registry
    }

    /// Look up a declared module.
    ///
    /// External modules have no definition and are reported as unknown here.
    pub fn resolve_module(&self, name: &str) -> Result<&'a ModuleDefinition, ResolveError> {
        self.registry.get(name).ok_or_else(|| ResolveError::UnknownModule {
            module: name.to_string(),
            required_by: None,
            suggestions: similar_names(name, self.registry.known_names()),
        })
    }

    /// The module's dependencies as seen from `visibility`.
    ///
    /// `Private` gives public followed by private dependencies, `Public`
    /// only the public ones. The result never contains `name`. Fails if a
    /// direct dependency is unknown, if a name sits in both lists, or if the
    /// public edges reachable from the module form a cycle.
    pub fn effective_dependencies(
        &self,
        name: &str,
        visibility: Visibility,
    ) -> Result<Vec<String>, ResolveError> {
        let module = self.resolve_module(name)?;
        self.check_visibility(module)?;

        for dep in module.dependencies(visibility) {
            if !self.registry.contains(dep) {
                return Err(ResolveError::UnknownModule {
                    module: dep.to_string(),
                    required_by: Some(name.to_string()),
                    suggestions: similar_names(dep, self.registry.known_names()),
                });
            }
        }

        self.check_public_cycle(name)?;

        let deps = module
            .dependencies(visibility)
            .filter(|dep| *dep != name)
            .map(str::to_string)
            .collect();
        Ok(deps)
    }

    /// Every module the module's own compilation units can see.
    ///
    /// That is each direct dependency, public or private, followed by the
    /// public closure it re-exports. Private dependencies of dependencies
    /// stay hidden.
    pub fn include_closure(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        let direct = self.effective_dependencies(name, Visibility::Private)?;

        let graph = ModuleGraph::build(
            self.registry,
            direct.iter().map(String::as_str),
            Visibility::Public,
            UnknownPolicy::Error,
        )?;
        if let Some(cycle) = graph.find_cycle() {
            return Err(ResolveError::CyclicDependency { cycle });
        }

        let mut seen = HashSet::new();
        let mut closure = Vec::new();
        for dep in &direct {
            self.collect_public(&graph, dep, &mut seen, &mut closure);
        }
        closure.retain(|m| m != name);
        Ok(closure)
    }

    fn collect_public(
        &self,
        graph: &ModuleGraph,
        name: &str,
        seen: &mut HashSet<String>,
        out: &mut Vec<String>,
    ) {
        if !seen.insert(name.to_string()) {
            return;
        }
        out.push(name.to_string());
        for (dep, _) in graph.dependencies(name) {
            self.collect_public(graph, dep, seen, out);
        }
    }

    fn check_visibility(&self, module: &ModuleDefinition) -> Result<(), ResolveError> {
        match module.visibility_conflict() {
            Some(dep) => Err(ResolveError::DuplicateVisibility {
                module: module.name.clone(),
                dependency: dep.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Any cycle over public edges reachable from `name` is an error. A
    /// cycle through `name` itself is preferred in the report.
    fn check_public_cycle(&self, name: &str) -> Result<(), ResolveError> {
        let graph =
            ModuleGraph::build(self.registry, [name], Visibility::Public, UnknownPolicy::Skip)?;

        let cycle = graph
            .cycle_through_module(name)
            .or_else(|| graph.find_cycle());
        match cycle {
            Some(cycle) => Err(ResolveError::CyclicDependency { cycle }),
            None => Ok(()),
        }
    }
}
