//! revtable CLI
//!
//! Command-line surface over the revision store: upload an artifact, list
//! stored revisions, activate one, or show the active key.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "revtable")]
#[command(about = "SQL-backed deployment revision index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upload an artifact as a new revision
    Upload(commands::upload::UploadArgs),
    /// List stored revisions, most recent first
    List(commands::list::ListArgs),
    /// Mark a revision as the live one
    Activate(commands::activate::ActivateArgs),
    /// Show the currently active revision key
    Active(commands::active::ActiveArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Upload(args) => commands::upload::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Activate(args) => commands::activate::execute(args),
        Commands::Active(args) => commands::active::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
