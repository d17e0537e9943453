//! Build configuration.
//!
//! Defines the YAML-serializable configuration that controls a build run:
//! parallelism, which handlers to skip, package metadata, and output format.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! jobs: 4
//! exclude:
//!   - App.Commands.Debug()
//!   - Internal
//! package:
//!   name: my-app
//!   description: Commands for my-app
//! output:
//!   format: json
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::output::OutputFormat;

/// Package metadata copied into every built [`SchemaPackage`].
///
/// [`SchemaPackage`]: handler_schema_core::SchemaPackage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Settings controlling how results are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Top-level build configuration.
///
/// Every field except `version` is optional in YAML.
///
/// # Examples
///
/// ```
/// use handler_schema_builder::config::BuildConfig;
///
/// let config: BuildConfig = serde_yaml::from_str("version: \"1.0\"\nexclude: [Debug]").unwrap();
/// assert!(config.is_excluded("App.Debug()", "Debug"));
/// assert!(!config.is_excluded("App.Build()", "Build"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Number of parallel build jobs (`None` = adaptive default).
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Handler identities or simple names to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub package: PackageConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            jobs: None,
            exclude: Vec::new(),
            package: PackageConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Io`] if the file cannot be read, or
    /// [`BuildError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Io`] if the file cannot be written, or
    /// [`BuildError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BuildError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if the handler is excluded by identity or simple name.
    pub fn is_excluded(&self, identity: &str, name: &str) -> bool {
        self.exclude.iter().any(|entry| {
            let entry = entry.trim();
            !entry.is_empty() && (entry == identity.trim() || entry == name.trim())
        })
    }
}
