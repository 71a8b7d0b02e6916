//! Resolution error types and diagnostics.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error while resolving modules or compiling a target.
///
/// These are static configuration faults: the only remedy is to fix the
/// declarations, so nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("unknown module `{module}`")]
    #[diagnostic(
        code(modgraph::resolve::unknown_module),
        help("declare the module or list it under [external] modules")
    )]
    UnknownModule {
        module: String,
        required_by: Option<String>,
        suggestions: Vec<String>,
    },

    #[error("cyclic dependency: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(modgraph::resolve::cyclic_dependency),
        help("break the cycle by removing or restructuring dependencies")
    )]
    CyclicDependency { cycle: Vec<String> },

    #[error("module `{module}` lists `{dependency}` as both a public and a private dependency")]
    #[diagnostic(
        code(modgraph::resolve::duplicate_visibility),
        help("keep `{dependency}` in exactly one of the two lists")
    )]
    DuplicateVisibility { module: String, dependency: String },

    #[error("target `{target}` does not pull in any modules")]
    #[diagnostic(
        code(modgraph::compile::empty_target),
        help("add at least one module to `extra-modules`")
    )]
    EmptyTarget { target: String },
}

/// The kind of a [`ResolveError`], for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownModule,
    CyclicDependency,
    DuplicateVisibility,
    EmptyTarget,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnknownModule => write!(f, "unknown-module"),
            ErrorKind::CyclicDependency => write!(f, "cyclic-dependency"),
            ErrorKind::DuplicateVisibility => write!(f, "duplicate-visibility"),
            ErrorKind::EmptyTarget => write!(f, "empty-target"),
        }
    }
}

impl ResolveError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::UnknownModule { .. } => ErrorKind::UnknownModule,
            ResolveError::CyclicDependency { .. } => ErrorKind::CyclicDependency,
            ResolveError::DuplicateVisibility { .. } => ErrorKind::DuplicateVisibility,
            ResolveError::EmptyTarget { .. } => ErrorKind::EmptyTarget,
        }
    }

    /// The offending module, if the error is about one.
    pub fn module(&self) -> Option<&str> {
        match self {
            ResolveError::UnknownModule { module, .. } => Some(module),
            ResolveError::CyclicDependency { cycle } => cycle.first().map(String::as_str),
            ResolveError::DuplicateVisibility { module, .. } => Some(module),
            ResolveError::EmptyTarget { .. } => None,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnknownModule {
                module,
                required_by,
                suggestions,
            } => {
                let mut diag = Diagnostic::error(format!("unknown module `{}`", module));

                if let Some(parent) = required_by {
                    diag = diag.with_context(format!("required by `{}`", parent));
                }

                if !suggestions.is_empty() {
                    diag = diag.with_context(format!("did you mean: {}?", suggestions.join(", ")));
                }

                diag.with_suggestion(format!("Declare a [[module]] named `{}`", module))
                    .with_suggestion(format!(
                        "List `{}` under [external] modules if the engine provides it",
                        module
                    ))
            }

            ResolveError::CyclicDependency { cycle } => {
                Diagnostic::error("cyclic dependency between modules")
                    .with_context(format!("cycle: {}", cycle.join(" -> ")))
                    .with_suggestion(
                        "Break the cycle by removing or restructuring dependencies".to_string(),
                    )
            }

            ResolveError::DuplicateVisibility { module, dependency } => Diagnostic::error(
                format!("ambiguous visibility for `{}` in module `{}`", dependency, module),
            )
            .with_context(format!(
                "`{}` appears in both the public and the private dependency list",
                dependency
            ))
            .with_suggestion(format!(
                "Keep `{}` public if dependents include its headers, private otherwise",
                dependency
            )),

            ResolveError::EmptyTarget { target } => {
                Diagnostic::error(format!("target `{}` does not pull in any modules", target))
                    .with_suggestion("Add at least one module to `extra-modules`".to_string())
            }
        }
    }
}

/// Names from `known` close enough to `name` to be worth suggesting.
pub fn similar_names<'a>(name: &str, known: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let lower = name.to_lowercase();
    let mut found: Vec<String> = known
        .into_iter()
        .filter(|candidate| *candidate != name)
        .filter(|candidate| {
            let candidate = candidate.to_lowercase();
            candidate.contains(&lower)
                || lower.contains(&candidate)
                || edit_distance(&candidate, &lower) <= 2
        })
        .map(str::to_string)
        .collect();
    found.sort();
    found.dedup();
    found.truncate(3);
    found
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_module_diagnostic() {
        let err = ResolveError::UnknownModule {
            module: "Ghost".to_string(),
            required_by: Some("PaperUnreal".to_string()),
            suggestions: vec!["Host".to_string()],
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("unknown module `Ghost`"));
        assert!(output.contains("required by `PaperUnreal`"));
        assert!(output.contains("did you mean: Host?"));
        assert_eq!(err.kind().to_string(), "unknown-module");
        assert_eq!(err.module(), Some("Ghost"));
    }

    #[test]
    fn test_cycle_message() {
        let err = ResolveError::CyclicDependency {
            cycle: vec!["A".to_string(), "B".to_string(), "A".to_string()],
        };

        assert_eq!(err.to_string(), "cyclic dependency: A -> B -> A");
        assert!(err.to_diagnostic().format(false).contains("cycle: A -> B -> A"));
        assert_eq!(err.module(), Some("A"));
    }

    #[test]
    fn test_duplicate_visibility_diagnostic() {
        let err = ResolveError::DuplicateVisibility {
            module: "Game".to_string(),
            dependency: "X".to_string(),
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("ambiguous visibility for `X`"));
        assert_eq!(err.kind(), ErrorKind::DuplicateVisibility);
    }

    #[test]
    fn test_similar_names() {
        let known = ["Core", "CoreUObject", "Engine", "InputCore"];
        assert_eq!(similar_names("Engin", known), vec!["Engine"]);
        assert_eq!(similar_names("core", known), vec!["Core", "CoreUObject", "InputCore"]);
        assert!(similar_names("Niagara", known).is_empty());
    }
}
