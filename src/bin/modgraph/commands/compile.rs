//! `modgraph compile` command

use anyhow::{bail, Context, Result};
use serde_json::json;

use crate::cli::CompileArgs;
use crate::commands::{describe, load_project};
use modgraph::builder::BuildGraph;
use modgraph::ops::{compile_targets, CompileOptions};
use modgraph::util::diagnostic::{emit, suggestions};
use modgraph::util::{GlobalContext, OutputFormat};

pub fn execute(args: CompileArgs, ctx: &GlobalContext) -> Result<()> {
    let project = load_project(ctx)?;
    let config = ctx.load_config(project.root());

    let opts = CompileOptions {
        targets: args.target,
        jobs: args.jobs.or(config.compile.jobs),
    };
    let report = compile_targets(&project, &opts)?;

    match args.format.unwrap_or_else(|| config.format()) {
        OutputFormat::Text => {
            for graph in report.succeeded() {
                print_graph(graph);
            }
        }
        OutputFormat::Json => {
            let graphs = report
                .succeeded()
                .map(|graph| -> Result<serde_json::Value, serde_json::Error> {
                    let mut value = serde_json::to_value(graph)?;
                    value["fingerprint"] = json!(graph.fingerprint());
                    Ok(value)
                })
                .collect::<Result<Vec<_>, serde_json::Error>>()
                .context("failed to serialize build graphs")?;

            let errors: Vec<_> = report
                .failed()
                .map(|e| {
                    json!({
                        "target": e.target,
                        "module": e.source.module(),
                        "kind": e.source.kind().to_string(),
                        "message": e.source.to_string(),
                    })
                })
                .collect();

            let doc = json!({ "graphs": graphs, "errors": errors });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    let failed = report.failed().count();
    for err in report.failed() {
        let diag = describe(
            &project,
            format!("failed to compile target `{}`", err.target),
            &err.source,
        );
        emit(&diag, config.color());
    }

    if failed > 0 {
        bail!(
            "{} of {} targets failed to compile\n{}",
            failed,
            report.outcomes.len(),
            suggestions::COMPILE_FAILED
        );
    }

    Ok(())
}

fn print_graph(graph: &BuildGraph) {
    println!(
        "{} ({}, build settings {}, include order {})",
        graph.target, graph.target_type, graph.build_settings, graph.include_order
    );
    for (i, unit) in graph.units.iter().enumerate() {
        println!("  {:>3}. {} [{}, {}]", i + 1, unit.name, unit.pch, unit.origin);
    }
    println!("  defines: {}", graph.defines.join(" "));
    println!("  fingerprint: {}", graph.fingerprint());
    println!();
}
