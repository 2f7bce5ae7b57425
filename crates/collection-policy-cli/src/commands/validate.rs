//! Validate command
//!
//! Usage: colpol validate <FILE>

use clap::Args;
use collection_policy_core::errors::ExError;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Policy file to check
    pub file: PathBuf,
}

/// Execute validate command
pub fn execute(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    match super::load_policy(&args.file) {
        Ok(_) => {
            println!("valid");
            Ok(())
        }
        Err(err) => {
            let ex_err: ExError = err.into();
            Err(ex_err
                .with_op("validate")
                .with_entity_id(args.file.display().to_string())
                .into())
        }
    }
}
