//! # trailmap CLI
//!
//! Command-line interface for the trailmap roadmap generator.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trailmap_server::ServeArgs;

#[derive(Parser)]
#[command(name = "trailmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "trailmap.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default trailmap.yml
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite an existing trailmap.yml
        #[arg(long)]
        force: bool,
    },

    /// Run the web server
    Serve(ServeArgs),

    /// Render roadmap markdown as collapsible HTML
    Render {
        /// Markdown file, or `-` for stdin
        input: PathBuf,

        /// Emit a complete HTML page instead of a fragment
        #[arg(long)]
        standalone: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how a roadmap document is segmented
    Outline {
        /// Markdown file, or `-` for stdin
        input: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate a roadmap once through the model API
    Generate(commands::generate::GenerateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path, force } => commands::init_project(path.as_deref(), force),
        Commands::Serve(args) => commands::serve(&cli.config, &args).await,
        Commands::Render {
            input,
            standalone,
            output,
        } => commands::render_file(&cli.config, &input, standalone, output.as_deref()),
        Commands::Outline { input, json } => commands::outline_file(&input, json),
        Commands::Generate(args) => commands::generate_roadmap(&cli.config, &args).await,
    }
}

/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
/// overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
