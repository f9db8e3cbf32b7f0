//! Generation run configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default banner written at the top of generated DDL scripts.
pub const DEFAULT_HEADER: &str = "-- Generated by pgweave. Do not edit.";

fn default_recursive() -> bool {
    true
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

/// Settings for one generation run, loadable from a YAML file.
///
/// Command-line flags mirror these fields; a config file keeps repeated
/// runs reproducible.
///
/// # Examples
///
/// ```
/// use pgweave_loader::GenerateConfig;
///
/// let yaml = "definitions: schema/\noutput: out/schema.sql\n";
/// let config: GenerateConfig = serde_yaml::from_str(yaml).unwrap();
/// assert!(config.recursive);
/// assert!(!config.drop_schemas);
/// assert_eq!(config.header, "-- Generated by pgweave. Do not edit.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Directory holding the definition files.
    pub definitions: PathBuf,
    /// Whether to descend into subdirectories. Defaults to true.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    /// Path of the generated SQL script.
    pub output: PathBuf,
    /// Banner comment written at the top of the script.
    #[serde(default = "default_header")]
    pub header: String,
    /// Emit `DROP SCHEMA ... CASCADE` statements before the creates.
    #[serde(default)]
    pub drop_schemas: bool,
}

impl GenerateConfig {
    /// Creates a config with default recursion, header, and drop behavior.
    pub fn new(definitions: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            definitions: definitions.into(),
            recursive: default_recursive(),
            output: output.into(),
            header: default_header(),
            drop_schemas: false,
        }
    }

    /// Reads a config from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Writes the config to a YAML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_minimal_yaml() {
        let config: GenerateConfig =
            serde_yaml::from_str("definitions: defs\noutput: out.sql\n").unwrap();
        assert_eq!(config, GenerateConfig::new("defs", "out.sql"));
    }

    #[test]
    fn test_explicit_fields_override_defaults() {
        let yaml = "definitions: defs\nrecursive: false\noutput: out.sql\nheader: '-- custom'\ndrop_schemas: true\n";
        let config: GenerateConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.recursive);
        assert!(config.drop_schemas);
        assert_eq!(config.header, "-- custom");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pgweave.yaml");

        let mut config = GenerateConfig::new("schema", "out/schema.sql");
        config.drop_schemas = true;
        config.save(&path).unwrap();

        assert_eq!(GenerateConfig::load(&path).unwrap(), config);
    }
}
