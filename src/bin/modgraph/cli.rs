//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use modgraph::util::OutputFormat;

/// modgraph - module dependency resolution for multi-target game builds
#[derive(Parser)]
#[command(name = "modgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command.
#[derive(Args)]
pub struct GlobalOpts {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Modgraph.toml (defaults to the nearest one upward from cwd)
    #[arg(long, global = true, env = "MODGRAPH_MANIFEST_PATH")]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile targets into build graphs
    Compile(CompileArgs),

    /// Validate every module and target
    Check(CheckArgs),

    /// List modules, external modules and targets
    List(ListArgs),

    /// Display a module's dependency tree
    Tree(TreeArgs),

    /// Explain why a module is part of a target
    Explain(ExplainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CompileArgs {
    /// Specific targets to compile (default: all)
    #[arg(long)]
    pub target: Vec<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Number of targets compiled concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Treat modules no target uses as errors
    #[arg(long)]
    pub deny_unreferenced: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Show where each module's winning declaration lives
    #[arg(long)]
    pub sources: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Module to show the tree for
    pub module: String,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Only follow public dependencies
    #[arg(long)]
    pub public_only: bool,
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Target to look in
    pub target: String,

    /// Module to explain
    pub module: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
