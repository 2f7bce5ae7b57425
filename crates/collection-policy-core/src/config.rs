//! Configuration consumed by policy mutations
//!
//! The only setting is the `dsid` stamped on newly added content models.
//! It is loaded from TOML and may be overridden from the environment; the
//! resulting `PolicyConfig` is passed explicitly to
//! `PolicyDocument::add_content_model`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PolicyError, Result};

/// Environment variable overriding `default_dsid`
pub const ENV_DEFAULT_DSID: &str = "COLLECTION_POLICY_DEFAULT_DSID";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Datastream id written as `dsid` on new content-model entries
    pub default_dsid: String,
}

impl PolicyConfig {
    pub fn new(default_dsid: impl Into<String>) -> Self {
        Self {
            default_dsid: default_dsid.into(),
        }
    }

    /// Apply `COLLECTION_POLICY_DEFAULT_DSID` when it is set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dsid) = lookup(ENV_DEFAULT_DSID) {
            self.default_dsid = dsid;
        }
        self
    }
}

/// Parse configuration from a TOML string
///
/// # Errors
/// Returns `PolicyError::Config` for invalid TOML or mistyped keys.
pub fn parse_config(toml_content: &str) -> Result<PolicyConfig> {
    toml::from_str(toml_content).map_err(|e| PolicyError::Config {
        message: format!("invalid config TOML: {}", e),
    })
}

/// Load configuration from a TOML file
///
/// # Errors
/// Returns `PolicyError::Io` if the file cannot be read and
/// `PolicyError::Config` if it does not parse.
pub fn load_config_from_file(path: impl AsRef<Path>) -> Result<PolicyConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
        message: format!("failed to read config file {:?}: {}", path, e),
    })?;

    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config_empty_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, PolicyConfig::default());
        assert_eq!(config.default_dsid, "");
    }

    #[test]
    fn test_parse_config_sets_dsid() {
        let config = parse_config(r#"default_dsid = "COLLECTION_POLICY""#).unwrap();
        assert_eq!(config.default_dsid, "COLLECTION_POLICY");
    }

    #[test]
    fn test_parse_config_invalid_toml() {
        let err = parse_config("default_dsid = [").unwrap_err();
        assert!(matches!(err, PolicyError::Config { .. }));
    }

    #[test]
    fn test_parse_config_wrong_type() {
        assert!(parse_config("default_dsid = 3").is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"default_dsid = "TN""#).unwrap();

        let config = load_config_from_file(file.path()).unwrap();
        assert_eq!(config.default_dsid, "TN");
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config_from_file("/nonexistent/path/policy.toml").unwrap_err();
        assert!(matches!(err, PolicyError::Io { .. }));
    }

    #[test]
    fn test_overrides_replace_dsid() {
        let config = PolicyConfig::new("FILE").with_overrides_from(|key| {
            (key == ENV_DEFAULT_DSID).then(|| "ENV".to_string())
        });
        assert_eq!(config.default_dsid, "ENV");
    }

    #[test]
    fn test_overrides_absent_keep_dsid() {
        let config = PolicyConfig::new("FILE").with_overrides_from(|_| None);
        assert_eq!(config.default_dsid, "FILE");
    }
}
