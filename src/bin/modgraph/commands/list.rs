//! `modgraph list` command

use anyhow::Result;

use crate::cli::ListArgs;
use crate::commands::load_project;
use modgraph::util::GlobalContext;

pub fn execute(args: ListArgs, ctx: &GlobalContext) -> Result<()> {
    let project = load_project(ctx)?;
    let registry = project.registry();

    println!("Project: {}", project.name());
    println!();

    println!("Modules:");
    if registry.is_empty() {
        println!("  (none)");
    }
    for entry in registry.modules() {
        let module = &entry.definition;
        let mut line = format!("  {} [{}]", module.name, module.pch);
        if entry.declarations > 1 {
            line.push_str(&format!(" (declared {} times, last one wins)", entry.declarations));
        }
        if registry.externals().any(|e| e == module.name) {
            line.push_str(" (shadows external)");
        }
        if args.sources {
            if let Some(path) = entry.declared_in.as_deref() {
                line.push_str(&format!(" - {}", project.display_path(path)));
            }
        }
        println!("{}", line);
    }
    println!();

    let externals: Vec<_> = registry.externals().collect();
    println!("External modules:");
    if externals.is_empty() {
        println!("  (none)");
    } else {
        println!("  {}", externals.join(", "));
    }
    println!();

    println!("Targets:");
    let mut any = false;
    for target in project.targets() {
        any = true;
        println!(
            "  {} ({}): {}",
            target.name,
            target.target_type,
            target.extra_modules.join(", ")
        );
    }
    if !any {
        println!("  (none)");
    }

    Ok(())
}
