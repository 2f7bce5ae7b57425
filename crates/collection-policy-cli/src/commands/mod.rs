pub mod edit;
pub mod show;
pub mod validate;

use collection_policy_core::errors::PolicyError;
use collection_policy_core::PolicyDocument;
use std::path::{Path, PathBuf};

/// Read and validate a policy file
pub fn load_policy(path: &Path) -> Result<PolicyDocument, PolicyError> {
    let text = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
        message: format!("failed to read {}: {}", path.display(), e),
    })?;
    PolicyDocument::from_xml(&text)
}

/// Write a serialized policy to `output`, or stdout when absent
pub fn emit(
    policy: &PolicyDocument,
    output: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let xml = policy.to_xml()?;
    match output {
        Some(path) => {
            std::fs::write(path, xml)?;
            eprintln!("✓ Wrote {}", path.display());
        }
        None => println!("{}", xml),
    }
    Ok(())
}
