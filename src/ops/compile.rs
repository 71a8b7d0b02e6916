//! Implementation of `modgraph compile`.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::builder::{BuildGraph, CompileError, TargetCompiler};
use crate::core::Project;

/// Options for the compile command.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Specific targets to compile (empty = all)
    pub targets: Vec<String>,

    /// Number of targets compiled concurrently
    pub jobs: Option<usize>,
}

/// Result of compiling one target.
#[derive(Debug)]
pub struct TargetOutcome {
    /// Target name
    pub target: String,

    /// The graph, or why there is none
    pub result: Result<BuildGraph, CompileError>,
}

/// Results of a compile run, in target-name order.
#[derive(Debug, Default)]
pub struct CompileReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl CompileReport {
    /// Graphs of targets that compiled.
    pub fn succeeded(&self) -> impl Iterator<Item = &BuildGraph> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Errors of targets that did not.
    pub fn failed(&self) -> impl Iterator<Item = &CompileError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// True if every selected target compiled.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Validate that all requested targets exist in the project.
fn validate_target_filter(project: &Project, targets: &[String]) -> Result<()> {
    for requested in targets {
        if project.target(requested).is_none() {
            let available: Vec<&str> = project.target_names().collect();
            bail!(
                "unknown target `{}`\n\
                 available targets: {}\n\
                 hint: use `modgraph list` to see all targets",
                requested,
                if available.is_empty() {
                    "(none)".to_string()
                } else {
                    available.join(", ")
                }
            );
        }
    }

    Ok(())
}

/// Compile the selected targets against the project's registry.
///
/// Targets are compiled concurrently; one target failing does not stop the
/// others. The registry is only read.
pub fn compile_targets(project: &Project, opts: &CompileOptions) -> Result<CompileReport> {
    validate_target_filter(project, &opts.targets)?;

    // project.targets() is already in name order
    let selected: Vec<_> = project
        .targets()
        .filter(|t| opts.targets.is_empty() || opts.targets.contains(&t.name))
        .collect();

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = opts.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build().context("failed to start compile workers")?;

    tracing::info!("Compiling {} targets", selected.len());

    let compiler = TargetCompiler::new(project.registry());
    let outcomes = pool.install(|| {
        selected
            .par_iter()
            .map(|target| TargetOutcome {
                target: target.name.clone(),
                result: compiler.compile_target(target),
            })
            .collect::<Vec<_>>()
    });

    for outcome in &outcomes {
        match &outcome.result {
            Ok(graph) => tracing::debug!("`{}`: {} units", outcome.target, graph.len()),
            Err(e) => tracing::debug!("`{}`: {}", outcome.target, e.source),
        }
    }

    Ok(CompileReport { outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ErrorKind;
    use crate::core::TargetType;
    use crate::test_support::ProjectBuilder;

    #[test]
    fn test_failures_are_isolated() {
        let project = ProjectBuilder::new("PaperUnreal")
            .externals(&["Core", "Engine"])
            .module("PaperUnreal", &["Core", "Engine"], &[])
            .target("PaperUnreal", TargetType::Game, &["PaperUnreal"])
            .target("PaperUnrealServer", TargetType::Server, &["PaperUnreal", "Ghost"])
            .build();

        let report = compile_targets(&project, &CompileOptions::default()).unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert!(!report.is_success());

        assert_eq!(report.outcomes[0].target, "PaperUnreal");
        assert_eq!(report.succeeded().count(), 1);

        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed[0].target, "PaperUnrealServer");
        assert_eq!(failed[0].source.kind(), ErrorKind::UnknownModule);
        assert_eq!(failed[0].source.module(), Some("Ghost"));
    }

    #[test]
    fn test_results_in_name_order_with_jobs() {
        let project = ProjectBuilder::new("p")
            .externals(&["Core"])
            .target("Zeta", TargetType::Game, &["Core"])
            .target("Alpha", TargetType::Client, &["Core"])
            .target("Mid", TargetType::Server, &["Core"])
            .build();

        let opts = CompileOptions {
            targets: Vec::new(),
            jobs: Some(2),
        };
        let report = compile_targets(&project, &opts).unwrap();
        let names: Vec<_> = report.outcomes.iter().map(|o| o.target.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
        assert!(report.is_success());
    }

    #[test]
    fn test_target_filter() {
        let project = ProjectBuilder::new("p")
            .externals(&["Core"])
            .target("Game", TargetType::Game, &["Core"])
            .target("Server", TargetType::Server, &["Core"])
            .build();

        let opts = CompileOptions {
            targets: vec!["Server".to_string()],
            jobs: None,
        };
        let report = compile_targets(&project, &opts).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].target, "Server");

        let opts = CompileOptions {
            targets: vec!["Editor".to_string()],
            jobs: None,
        };
        let err = compile_targets(&project, &opts).unwrap_err();
        assert!(err.to_string().contains("unknown target `Editor`"));
    }
}
