//! Collection policy CLI
//!
//! Operator tooling over collection policy files on disk.

use clap::{Parser, Subcommand};
use collection_policy_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "colpol")]
#[command(about = "Inspect and edit collection policy documents", long_about = None)]
struct Cli {
    /// Emit JSON logs instead of human-readable ones
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check a policy file against the collection-policy schema
    Validate(commands::validate::ValidateArgs),
    /// Print a policy's name, relationship and content models
    Show(commands::show::ShowArgs),
    /// Print an empty policy
    Empty(commands::edit::EmptyArgs),
    /// Append a content model to a policy
    Add(commands::edit::AddArgs),
    /// Remove content models from a policy by pid
    Remove(commands::edit::RemoveArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Show(args) => commands::show::execute(args),
        Commands::Empty(args) => commands::edit::execute_empty(args),
        Commands::Add(args) => commands::edit::execute_add(args),
        Commands::Remove(args) => commands::edit::execute_remove(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
