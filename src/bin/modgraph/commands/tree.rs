//! `modgraph tree` command

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::cli::TreeArgs;
use crate::commands::load_project;
use modgraph::core::{ModuleRegistry, Visibility};
use modgraph::resolver::similar_names;
use modgraph::util::diagnostic::suggestions;
use modgraph::util::GlobalContext;

pub fn execute(args: TreeArgs, ctx: &GlobalContext) -> Result<()> {
    let project = load_project(ctx)?;
    let registry = project.registry();

    if !registry.contains(&args.module) {
        let similar = similar_names(&args.module, registry.known_names());
        let hint = if similar.is_empty() {
            String::new()
        } else {
            format!("did you mean: {}?\n", similar.join(", "))
        };
        bail!(
            "unknown module `{}`\n{}{}",
            args.module,
            hint,
            suggestions::MODULE_NOT_FOUND
        );
    }

    let scope = if args.public_only {
        Visibility::Public
    } else {
        Visibility::Private
    };

    let mut seen = HashSet::new();
    print_tree(
        registry,
        &args.module,
        None,
        0,
        args.depth.unwrap_or(usize::MAX),
        scope,
        &mut seen,
    );

    Ok(())
}

fn print_tree(
    registry: &ModuleRegistry,
    name: &str,
    via: Option<Visibility>,
    depth: usize,
    max_depth: usize,
    scope: Visibility,
    seen: &mut HashSet<String>,
) {
    if depth > max_depth {
        return;
    }

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };

    let mut markers = String::new();
    if via == Some(Visibility::Private) {
        markers.push_str(" (private)");
    }
    if registry.is_external(name) {
        markers.push_str(" (external)");
    } else if !registry.contains(name) {
        markers.push_str(" (unknown)");
    }

    // Already expanded above: print once, don't recurse (also stops cycles)
    let is_duplicate = !seen.insert(name.to_string());
    if is_duplicate && registry.get(name).is_some_and(|m| m.edges().next().is_some()) {
        markers.push_str(" (*)");
    }

    println!("{}{}{}", prefix, name, markers);

    if is_duplicate {
        return;
    }

    if let Some(module) = registry.get(name) {
        for (dep, visibility) in module.edges() {
            if scope == Visibility::Public && visibility == Visibility::Private {
                continue;
            }
            print_tree(registry, dep, Some(visibility), depth + 1, max_depth, scope, seen);
        }
    }
}
