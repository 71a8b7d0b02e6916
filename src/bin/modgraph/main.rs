//! modgraph CLI - module dependency resolution for multi-target game builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use modgraph::util::GlobalContext;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("modgraph=debug")
    } else {
        EnvFilter::new("modgraph=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?.with_manifest_path(cli.global.manifest_path);
    ctx.set_color(!cli.global.no_color);

    // Execute command
    match cli.command {
        Commands::Compile(args) => commands::compile::execute(args, &ctx),
        Commands::Check(args) => commands::check::execute(args, &ctx),
        Commands::List(args) => commands::list::execute(args, &ctx),
        Commands::Tree(args) => commands::tree::execute(args, &ctx),
        Commands::Explain(args) => commands::explain::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
