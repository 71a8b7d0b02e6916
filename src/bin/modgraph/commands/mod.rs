//! Command implementations

pub mod check;
pub mod compile;
pub mod completions;
pub mod explain;
pub mod list;
pub mod tree;

use anyhow::{anyhow, Result};

use modgraph::core::Project;
use modgraph::resolver::ResolveError;
use modgraph::util::diagnostic::{suggestions, Diagnostic};
use modgraph::util::GlobalContext;

/// Find and load the project the context points at.
pub fn load_project(ctx: &GlobalContext) -> Result<Project> {
    let manifest_path = ctx
        .find_manifest()
        .map_err(|e| anyhow!("{}\n{}", e, suggestions::NO_MANIFEST))?;

    Project::load(&manifest_path)
}

/// Render a resolution error with where the offending module is declared.
pub fn describe(project: &Project, headline: String, error: &ResolveError) -> Diagnostic {
    let cause = error.to_diagnostic();

    let mut diag = Diagnostic::error(headline).with_context(format!("kind: {}", error.kind()));
    if let Some(module) = error.module() {
        diag = diag.with_context(format!("module: {}", module));

        let declared_in = project
            .registry()
            .entry(module)
            .and_then(|e| e.declared_in.as_deref());
        if let Some(path) = declared_in {
            diag = diag.with_location(project.display_path(path));
        }
    }

    diag = diag.with_context(cause.message);
    for line in cause.context {
        diag = diag.with_context(line);
    }
    for suggestion in cause.suggestions {
        diag = diag.with_suggestion(suggestion);
    }
    diag
}
