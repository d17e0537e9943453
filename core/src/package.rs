use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::CommandSchema;

/// Serializable bundle of command schemas for the downstream generator.
///
/// A package groups the schemas produced in one build run with version
/// metadata and a content hash, so consumers can detect when the handler
/// set has changed.
///
/// # Examples
///
/// ```
/// use handler_schema_core::*;
///
/// let mut package = SchemaPackage::new("1.0.0", "2024-01-15T10:30:00Z");
/// package.name = Some("my-app".into());
/// package
///     .schemas
///     .push(assemble_command(&HandlerDescription::new("App.Run()", "run", "App")).unwrap());
///
/// assert_eq!(package.schema_count(), 1);
/// assert_eq!(package.version, "1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPackage {
    /// Schema contract version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Package format version (semver string).
    pub version: String,
    /// Optional package name.
    pub name: Option<String>,
    /// Optional package description.
    pub description: Option<String>,
    /// ISO-8601 timestamp for package creation.
    pub generated_at: String,
    /// SHA-256 of the schemas' canonical JSON, set by
    /// [`seal`](SchemaPackage::seal).
    pub bundle_hash: Option<String>,
    /// Command schemas included in this package.
    pub schemas: Vec<CommandSchema>,
}

impl SchemaPackage {
    /// Creates a package with required fields.
    ///
    /// The `schema_version` is automatically set from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION).
    pub fn new(version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            schema_version: Some(crate::SCHEMA_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            generated_at: generated_at.into(),
            bundle_hash: None,
            schemas: Vec::new(),
        }
    }

    /// Returns the number of schemas in this package.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Finds a schema by handler identity.
    pub fn find(&self, identity: &str) -> Option<&CommandSchema> {
        self.schemas.iter().find(|schema| schema.id() == identity)
    }

    /// Computes the content hash of the schemas.
    ///
    /// The hash covers only the schemas, not timestamps or names, so two
    /// builds of the same handlers hash identically.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if a schema cannot be encoded.
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(&self.schemas)?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }

    /// Sorts schemas by identity and records the content hash.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if a schema cannot be encoded.
    pub fn seal(&mut self) -> Result<(), serde_json::Error> {
        self.schemas.sort_by(|a, b| a.id().cmp(b.id()));
        self.bundle_hash = Some(self.content_hash()?);
        Ok(())
    }
}
