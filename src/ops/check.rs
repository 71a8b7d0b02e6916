//! Implementation of `modgraph check`.
//!
//! Validates the whole project instead of stopping at the first fault:
//! every declared module is resolved from both sides and every target is
//! compiled.

use std::collections::HashSet;
use std::fmt;

use crate::builder::TargetCompiler;
use crate::core::{Project, Visibility};
use crate::resolver::{ModuleGraph, ModuleResolver, ResolveError, UnknownPolicy};

/// What a problem was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Module(String),
    Target(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Module(name) => write!(f, "module `{}`", name),
            Subject::Target(name) => write!(f, "target `{}`", name),
        }
    }
}

/// One configuration fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub subject: Subject,
    pub error: ResolveError,
}

/// Everything `check` found.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Faults, modules first (in name order), then targets
    pub problems: Vec<Problem>,

    /// Declared modules no target pulls in
    pub unreferenced: Vec<String>,

    /// Modules checked
    pub modules_checked: usize,

    /// Targets checked
    pub targets_checked: usize,
}

impl CheckReport {
    /// True if no faults were found. Unreferenced modules are not faults.
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Check every module and target in the project.
pub fn check_project(project: &Project) -> CheckReport {
    let registry = project.registry();
    let resolver = ModuleResolver::new(registry);
    let compiler = TargetCompiler::new(registry);
    let mut report = CheckReport::default();

    for name in registry.module_names() {
        let subject = Subject::Module(name.to_string());
        let mut seen: Vec<ResolveError> = Vec::new();

        for visibility in [Visibility::Public, Visibility::Private] {
            if let Err(error) = resolver.effective_dependencies(name, visibility) {
                if !seen.contains(&error) {
                    seen.push(error.clone());
                    report.problems.push(Problem {
                        subject: subject.clone(),
                        error,
                    });
                }
            }
        }
        report.modules_checked += 1;
    }

    for target in project.targets() {
        if let Err(e) = compiler.compile_target(target) {
            report.problems.push(Problem {
                subject: Subject::Target(target.name.clone()),
                error: e.source,
            });
        }
        report.targets_checked += 1;
    }

    // Reachability ignores faults so a broken target still marks what it uses.
    let mut referenced = HashSet::new();
    for target in project.targets() {
        if let Ok(graph) = ModuleGraph::build(
            registry,
            target.extra_modules.iter().map(String::as_str),
            Visibility::Private,
            UnknownPolicy::Skip,
        ) {
            referenced.extend(graph.modules().map(str::to_string));
        }
    }
    report.unreferenced = registry
        .module_names()
        .filter(|name| !referenced.contains(*name))
        .map(str::to_string)
        .collect();

    tracing::debug!(
        "checked {} modules and {} targets: {} problems",
        report.modules_checked,
        report.targets_checked,
        report.problems.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetType;
    use crate::resolver::ErrorKind;
    use crate::test_support::{paper_unreal, ProjectBuilder};

    #[test]
    fn test_clean_project() {
        let report = check_project(&paper_unreal());
        assert!(report.is_clean());
        assert!(report.unreferenced.is_empty());
        assert_eq!(report.modules_checked, 1);
        assert_eq!(report.targets_checked, 2);
    }

    #[test]
    fn test_collects_every_fault() {
        let project = ProjectBuilder::new("p")
            .externals(&["Core"])
            .module("A", &["B"], &[])
            .module("B", &["A"], &[])
            .module("Game", &["Core", "X"], &["X"])
            .module("Legacy", &["Core"], &[])
            .target("Game", TargetType::Game, &["Game"])
            .target("Loop", TargetType::Client, &["A"])
            .target("Empty", TargetType::Server, &[])
            .build();

        let report = check_project(&project);
        let kinds: Vec<_> = report
            .problems
            .iter()
            .map(|p| (p.subject.to_string(), p.error.kind()))
            .collect();

        assert!(kinds.contains(&("module `A`".to_string(), ErrorKind::CyclicDependency)));
        assert!(kinds.contains(&("module `B`".to_string(), ErrorKind::CyclicDependency)));
        assert!(kinds.contains(&("module `Game`".to_string(), ErrorKind::DuplicateVisibility)));
        assert!(kinds.contains(&("target `Empty`".to_string(), ErrorKind::EmptyTarget)));
        assert!(kinds.contains(&("target `Loop`".to_string(), ErrorKind::CyclicDependency)));

        // the same fault seen from both sides is reported once
        let game_problems = report
            .problems
            .iter()
            .filter(|p| p.subject == Subject::Module("Game".to_string()))
            .count();
        assert_eq!(game_problems, 1);

        assert_eq!(report.unreferenced, vec!["Legacy"]);
    }
}
