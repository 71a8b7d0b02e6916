//! `modgraph explain` command

use anyhow::{anyhow, bail, Result};

use crate::cli::ExplainArgs;
use crate::commands::load_project;
use modgraph::builder::TargetCompiler;
use modgraph::util::diagnostic::suggestions;
use modgraph::util::GlobalContext;

pub fn execute(args: ExplainArgs, ctx: &GlobalContext) -> Result<()> {
    let project = load_project(ctx)?;

    let target = project.target(&args.target).ok_or_else(|| {
        anyhow!(
            "target `{}` not found\n{}",
            args.target,
            suggestions::TARGET_NOT_FOUND
        )
    })?;

    let compiler = TargetCompiler::new(project.registry());
    let Some(chain) = compiler.explain(target, &args.module)? else {
        bail!(
            "module `{}` is not part of target `{}`",
            args.module,
            target.name
        );
    };

    println!(
        "`{}` is part of target `{}` ({}) through:",
        args.module, target.name, target.target_type
    );
    for (depth, step) in chain.iter().enumerate() {
        let indent = "   ".repeat(depth);
        let via = match step.via {
            Some(visibility) => format!(" ({})", visibility),
            None => " (extra module)".to_string(),
        };
        if depth == 0 {
            println!("{}{}", step.module, via);
        } else {
            println!("{}└─ {}{}", &indent[3..], step.module, via);
        }
    }

    Ok(())
}
