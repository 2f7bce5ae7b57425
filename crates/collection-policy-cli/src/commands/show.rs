//! Show command
//!
//! Usage: colpol show <FILE> [--json]

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Policy file to read
    pub file: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute show command
pub fn execute(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let policy = super::load_policy(&args.file)?;
    let models = policy.content_models();

    if args.json {
        let value = serde_json::json!({
            "name": policy.name(),
            "relationship": policy.relationship(),
            "content_models": models,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("name:         {}", policy.name());
    println!("relationship: {}", policy.relationship());
    println!("content models ({}):", models.len());
    for entry in models.values() {
        println!("  {}  name={:?} namespace={}", entry.pid, entry.name, entry.namespace);
    }
    Ok(())
}
