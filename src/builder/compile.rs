//! Target compilation - from a TargetDefinition to a BuildGraph.

use thiserror::Error;

use crate::builder::plan::{BuildGraph, BuildUnit, UnitOrigin};
use crate::core::{ModuleRegistry, PchMode, TargetDefinition, Visibility};
use crate::resolver::{ModuleGraph, ResolveError, UnknownPolicy};

/// A target failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to compile target `{target}`")]
pub struct CompileError {
    /// The target that failed
    pub target: String,

    /// What went wrong
    #[source]
    pub source: ResolveError,
}

impl CompileError {
    fn new(target: &TargetDefinition, source: ResolveError) -> Self {
        CompileError {
            target: target.name.clone(),
            source,
        }
    }
}

/// One hop in the chain that pulls a module into a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    /// Module reached
    pub module: String,
    /// Visibility of the edge that reached it (None for the target's own modules)
    pub via: Option<Visibility>,
}

/// Flattens targets into build graphs.
#[derive(Debug, Clone, Copy)]
pub struct TargetCompiler<'a> {
    registry: &'a ModuleRegistry,
}

impl<'a> TargetCompiler<'a> {
    /// Create a compiler over a registry.
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        TargetCompiler { registry }
    }

    /// Compile a target.
    ///
    /// Public and private edges are both followed: private dependencies still
    /// have to be built, they are just not exposed to other modules. Every
    /// module in the result comes after all of its dependencies.
    pub fn compile_target(&self, target: &TargetDefinition) -> Result<BuildGraph, CompileError> {
        self.check_buildable(target)?;
        self.check_visibility(target)?;
        let graph = self.module_graph(target)?;

        let order = graph
            .topological_order()
            .map_err(|e| CompileError::new(target, e))?;

        let units = order
            .into_iter()
            .map(|name| {
                let origin = if self.registry.is_external(&name) {
                    UnitOrigin::External
                } else {
                    UnitOrigin::Project
                };
                let pch = self.registry.pch_mode(&name).unwrap_or(PchMode::Default);
                BuildUnit { name, pch, origin }
            })
            .collect::<Vec<_>>();

        tracing::debug!("compiled target `{}`: {} units", target.name, units.len());

        Ok(BuildGraph {
            target: target.name.clone(),
            target_type: target.target_type,
            build_settings: target.build_settings.clone(),
            include_order: target.include_order.clone(),
            defines: target.effective_defines(),
            units,
        })
    }

    /// The shortest chain of dependencies that pulls `module` into `target`.
    ///
    /// Returns `Ok(None)` if the target does not need the module at all.
    pub fn explain(
        &self,
        target: &TargetDefinition,
        module: &str,
    ) -> Result<Option<Vec<ChainStep>>, CompileError> {
        let graph = self.module_graph(target)?;
        let chain = graph.path_to(module).map(|steps| {
            steps
                .into_iter()
                .map(|(module, via)| ChainStep { module, via })
                .collect()
        });
        Ok(chain)
    }

    fn check_buildable(&self, target: &TargetDefinition) -> Result<(), CompileError> {
        if target.is_buildable() {
            return Ok(());
        }
        Err(CompileError::new(
            target,
            ResolveError::EmptyTarget {
                target: target.name.clone(),
            },
        ))
    }

    /// Reject a module that lists a dependency as both public and private.
    ///
    /// Runs over everything reachable, skipping unknown names, so the
    /// conflict is reported even when the doubly listed module is undeclared.
    fn check_visibility(&self, target: &TargetDefinition) -> Result<(), CompileError> {
        let reachable = ModuleGraph::build(
            self.registry,
            target.extra_modules.iter().map(String::as_str),
            Visibility::Private,
            UnknownPolicy::Skip,
        )
        .map_err(|e| CompileError::new(target, e))?;

        for name in reachable.modules() {
            if let Some(conflict) = self.registry.get(name).and_then(|m| m.visibility_conflict()) {
                return Err(CompileError::new(
                    target,
                    ResolveError::DuplicateVisibility {
                        module: name.to_string(),
                        dependency: conflict.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }

    fn module_graph(&self, target: &TargetDefinition) -> Result<ModuleGraph, CompileError> {
        self.check_buildable(target)?;

        ModuleGraph::build(
            self.registry,
            target.extra_modules.iter().map(String::as_str),
            Visibility::Private,
            UnknownPolicy::Error,
        )
        .map_err(|e| match e {
            ResolveError::UnknownModule {
                module,
                required_by: None,
                suggestions,
            } => ResolveError::UnknownModule {
                module,
                required_by: Some(target.name.clone()),
                suggestions,
            },
            other => other,
        })
        .map_err(|e| CompileError::new(target, e))
    }
}
