//! Policy editing commands
//!
//! Usage:
//!   colpol empty [--output <FILE>]
//!   colpol add <FILE> --pid <PID> --name <NAME> --namespace <NS> [--config <TOML>]
//!   colpol remove <FILE> <PID>...

use clap::Args;
use collection_policy_core::config::load_config_from_file;
use collection_policy_core::errors::ExError;
use collection_policy_core::{PolicyConfig, PolicyDocument};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct EmptyArgs {
    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Policy file to edit
    pub file: PathBuf,

    /// Content model pid
    #[arg(long)]
    pub pid: String,

    /// Default label for new members
    #[arg(long, default_value = "")]
    pub name: String,

    /// Default pid namespace for new members
    #[arg(long)]
    pub namespace: String,

    /// TOML configuration supplying `default_dsid`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Policy file to edit
    pub file: PathBuf,

    /// Pids to remove, first match each
    #[arg(required = true)]
    pub pids: Vec<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute empty command
pub fn execute_empty(args: EmptyArgs) -> Result<(), Box<dyn std::error::Error>> {
    super::emit(&PolicyDocument::empty(), args.output.as_ref())
}

/// Execute add command
pub fn execute_add(args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => load_config_from_file(path)?,
        None => PolicyConfig::default(),
    }
    .with_env_overrides();

    let mut policy = super::load_policy(&args.file)?;
    if policy.has_content_model(&args.pid) {
        tracing::warn!(pid = %args.pid, "content model already present, appending duplicate");
    }
    policy.add_content_model(&args.pid, &args.name, &args.namespace, &config);
    policy
        .validate()
        .map_err(|err| ExError::from(err).with_op("add"))?;

    super::emit(&policy, args.output.as_ref())
}

/// Execute remove command
pub fn execute_remove(args: RemoveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut policy = super::load_policy(&args.file)?;
    let processed = policy.remove_content_model(&args.pids);
    eprintln!("Processed {} candidate(s)", processed);

    super::emit(&policy, args.output.as_ref())
}
