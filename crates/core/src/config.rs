use crate::error::{Error, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::tiers::TierId;

/// Main configuration structure for the testtriage tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Candidate discovery configuration
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Extra tier patterns layered over the built-in table
    #[serde(default)]
    pub patterns: PatternsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration for candidate discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Root directory the walk starts from
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns for paths to skip during the walk
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Whether to follow symbolic links
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,
}

/// Extra glob patterns keyed by tier identifier
///
/// ```toml
/// [patterns.extra]
/// l2 = ["tests/e2e/audio/test_*.py"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternsConfig {
    /// Tier identifier -> additional globs; extends the built-in table
    #[serde(default)]
    pub extra: BTreeMap<String, Vec<String>>,
}

/// Configuration for output rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "**/__pycache__/**".to_string(),
        "*.pyc".to_string(),
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_format() -> String {
    "human".to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            ignore_patterns: default_ignore_patterns(),
            follow_symlinks: default_true(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `TESTTRIAGE_` and use double
    /// underscores for nested values. For example:
    /// - `TESTTRIAGE_OUTPUT__FORMAT=json`
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with TESTTRIAGE_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TESTTRIAGE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate output format
        let valid_formats = ["human", "json"];
        if !valid_formats.contains(&self.output.format.as_str()) {
            return Err(Error::config(format!(
                "Invalid output format '{}'. Must be one of: {:?}",
                self.output.format, valid_formats
            )));
        }

        // Validate ignore patterns compile
        for pattern in &self.discovery.ignore_patterns {
            glob::Pattern::new(pattern)?;
        }

        // Validate extra pattern keys name known tiers and their globs compile
        for (key, globs) in &self.patterns.extra {
            TierId::from_str(key).map_err(|_| Error::unknown_tier(key.clone()))?;
            for pattern in globs {
                glob::Pattern::new(pattern)?;
            }
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.format, "human");
        assert_eq!(config.discovery.root, PathBuf::from("."));
        assert!(config.discovery.follow_symlinks);
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            r#"
            [discovery]
            root = "suite"
            ignore_patterns = ["*.tmp"]
            follow_symlinks = false

            [patterns.extra]
            l2 = ["tests/e2e/audio/test_*.py"]

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.discovery.root, PathBuf::from("suite"));
        assert_eq!(config.discovery.ignore_patterns, vec!["*.tmp".to_string()]);
        assert!(!config.discovery.follow_symlinks);
        assert_eq!(
            config.patterns.extra.get("l2"),
            Some(&vec!["tests/e2e/audio/test_*.py".to_string()])
        );
        assert_eq!(config.output.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_format() {
        let config = Config::from_toml_str(
            r#"
            [output]
            format = "yaml"
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid output format"));
    }

    #[test]
    fn test_validate_rejects_unknown_tier_key() {
        let config = Config::from_toml_str(
            r#"
            [patterns.extra]
            l7 = ["tests/*"]
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::UnknownTier(_)));
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let config = Config::from_toml_str(
            r#"
            [discovery]
            ignore_patterns = ["tests/["]
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testtriage.toml");

        let mut config = Config::default();
        config.output.format = "json".to_string();
        config.save(&path).unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.output.format, "json");
    }
}
