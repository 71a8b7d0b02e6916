//! `modgraph check` command

use anyhow::{bail, Result};

use crate::cli::CheckArgs;
use crate::commands::{describe, load_project};
use modgraph::ops::check_project;
use modgraph::util::diagnostic::{emit, Diagnostic};
use modgraph::util::GlobalContext;

pub fn execute(args: CheckArgs, ctx: &GlobalContext) -> Result<()> {
    let project = load_project(ctx)?;
    let color = ctx.load_config(project.root()).color();

    let report = check_project(&project);

    for problem in &report.problems {
        let diag = describe(&project, format!("{}: {}", problem.subject, problem.error), &problem.error);
        emit(&diag, color);
    }

    for name in &report.unreferenced {
        let mut diag = Diagnostic::warning(format!("module `{}` is not used by any target", name))
            .with_suggestion(format!("Add `{}` to a target's `extra-modules` or remove it", name));
        if let Some(path) = project
            .registry()
            .entry(name)
            .and_then(|e| e.declared_in.as_deref())
        {
            diag = diag.with_location(project.display_path(path));
        }
        emit(&diag, color);
    }

    let mut problems = report.problems.len();
    if args.deny_unreferenced {
        problems += report.unreferenced.len();
    }

    if problems > 0 {
        bail!(
            "found {} problem{} in {} modules and {} targets",
            problems,
            if problems == 1 { "" } else { "s" },
            report.modules_checked,
            report.targets_checked
        );
    }

    println!(
        "checked {} modules and {} targets: no problems found",
        report.modules_checked, report.targets_checked
    );
    Ok(())
}
