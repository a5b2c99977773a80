mod cmd;
mod output;
mod root;
mod tools;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, hook::HookSubcommand, planning::PlanningSubcommand,
    shovel::ShovelSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "clouvel",
    about = "Documentation-first coding gate with planning memory and session recovery",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .claude/ or .git/)
    #[arg(long, global = true, env = "CLAUDE_PROJECT_DIR")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether coding may start; exits non-zero while documents are missing
    CanCode {
        /// Documents directory (default: docs_dir from config)
        path: Option<PathBuf>,
    },

    /// List the files in the documents directory
    ScanDocs {
        /// Documents directory (default: docs_dir from config)
        path: Option<PathBuf>,
    },

    /// Report required-document coverage without blocking
    AnalyzeDocs {
        /// Documents directory (default: docs_dir from config)
        path: Option<PathBuf>,
    },

    /// Create templates for every required document that does not exist yet
    InitDocs {
        /// Project name used in template titles (default: root directory name)
        #[arg(long)]
        project_name: Option<String>,
    },

    /// Manage the task plan, findings log and progress log
    Planning {
        #[command(subcommand)]
        subcommand: PlanningSubcommand,
    },

    /// Install and sync the Shovel .claude/ layout
    Shovel {
        #[command(subcommand)]
        subcommand: ShovelSubcommand,
    },

    /// Show or validate .claude/clouvel.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Session continuity hooks (read a JSON event on stdin)
    Hook {
        #[command(subcommand)]
        subcommand: HookSubcommand,
    },

    /// Run as an MCP stdio server
    Mcp,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Mcp => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout carries MCP and hook JSON; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = match cli.command {
        Commands::CanCode { path } => cmd::docs::can_code(&root, path, cli.json),
        Commands::ScanDocs { path } => cmd::docs::scan(&root, path, cli.json),
        Commands::AnalyzeDocs { path } => cmd::docs::analyze(&root, path, cli.json),
        Commands::InitDocs { project_name } => cmd::docs::init(&root, project_name, cli.json),
        Commands::Planning { subcommand } => cmd::planning::run(&root, subcommand, cli.json),
        Commands::Shovel { subcommand } => cmd::shovel::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Hook { subcommand } => cmd::hook::run(&root, subcommand),
        Commands::Mcp => cmd::mcp::run(&root),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
