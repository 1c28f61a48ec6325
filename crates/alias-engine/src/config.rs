use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AliasError, Result};
use crate::template::CONSOLE_PREFIX;
use crate::types::DEFAULT_PERMISSION_PREFIX;

/// Alias engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AliasesConfig {
    /// Definition source file (JSON or YAML)
    pub aliases_file: PathBuf,

    /// Each alias requires `<permission_prefix>.<name>`
    pub permission_prefix: String,

    /// Expanded commands starting with this run as the console
    pub console_prefix: String,

    /// Name of the operator reload command
    pub reload_command: String,

    /// Permission of the operator reload command
    pub reload_permission: String,

    /// Write the bootstrap aliases when the definition file is missing
    pub write_defaults: bool,
}

impl Default for AliasesConfig {
    fn default() -> Self {
        Self {
            aliases_file: PathBuf::from("aliases.json"),
            permission_prefix: DEFAULT_PERMISSION_PREFIX.to_string(),
            console_prefix: CONSOLE_PREFIX.to_string(),
            reload_command: "reloadaliases".to_string(),
            reload_permission: "aliases.reloadaliases".to_string(),
            write_defaults: true,
        }
    }
}

impl AliasesConfig {
    /// Load configuration from a file (auto-detect format)
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AliasError::Config(format!("Failed to read config file: {}", e)))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            _ => Err(AliasError::Config(
                "Unsupported file format. Use .yaml, .yml, or .json".to_string(),
            )),
        }
    }

    /// Save configuration to a file (auto-detect format)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let content = match extension {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "json" => serde_json::to_string_pretty(self)?,
            _ => {
                return Err(AliasError::Config(
                    "Unsupported file format. Use .yaml, .yml, or .json".to_string(),
                ))
            }
        };

        fs::write(path, content)
            .map_err(|e| AliasError::Config(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    pub fn with_aliases_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.aliases_file = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AliasesConfig::default();
        assert_eq!(config.aliases_file, PathBuf::from("aliases.json"));
        assert_eq!(config.permission_prefix, "alias");
        assert_eq!(config.console_prefix, "console:");
        assert_eq!(config.reload_command, "reloadaliases");
        assert!(config.write_defaults);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AliasesConfig::load_from_file(dir.path().join("none.yaml")).unwrap();
        assert_eq!(config, AliasesConfig::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aliases-config.yaml");
        fs::write(&path, "console_prefix: \"sudo:\"\nwrite_defaults: false\n").unwrap();

        let config = AliasesConfig::load_from_file(&path).unwrap();
        assert_eq!(config.console_prefix, "sudo:");
        assert!(!config.write_defaults);
        assert_eq!(config.reload_command, "reloadaliases");
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = AliasesConfig::default().with_aliases_file("custom.yaml");

        config.save_to_file(&path).unwrap();
        let loaded = AliasesConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            AliasesConfig::load_from_file(&path),
            Err(AliasError::Config(_))
        ));
        assert!(AliasesConfig::default().save_to_file(&path).is_err());
    }
}
