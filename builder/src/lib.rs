//! Manifest-driven command schema builds.
//!
//! This crate wraps [`handler_schema_core`] with everything needed to run a
//! build over real files:
//!
//! - [`manifest`]: reading handler manifests (JSON or YAML) and packages.
//! - [`doc_comment`]: parsing raw XML doc comments into documentation.
//! - [`batch`]: building many handlers in parallel with per-handler
//!   failure isolation.
//! - [`config`]: YAML build configuration.
//! - [`output`] / [`report`]: rendering schemas, packages and reports.
//!
//! # Example
//!
//! ```
//! use handler_schema_builder::batch::build_handlers;
//! use handler_schema_builder::config::BuildConfig;
//! use handler_schema_builder::manifest::HandlerManifest;
//!
//! let manifest: HandlerManifest = serde_yaml::from_str(r#"
//! handlers:
//!   - identity: "App.Build(string)"
//!     name: Build
//!     namespace: App
//!     parameters:
//!       - { name: configArg, type_name: string }
//! "#).unwrap();
//!
//! let outcome = build_handlers(&manifest.handlers, &BuildConfig::default(), "1.0.0").unwrap();
//! assert_eq!(outcome.package.schema_count(), 1);
//! assert!(outcome.failures.is_empty());
//! ```

pub mod batch;
pub mod config;
pub mod doc_comment;
pub mod error;
pub mod manifest;
pub mod output;
pub mod report;

use std::path::PathBuf;

pub use batch::{BuildOutcome, build_handlers};
pub use config::BuildConfig;
pub use error::BuildError;
pub use output::OutputFormat;

/// Collects manifests from `inputs` (files or directories) and builds them.
///
/// # Errors
///
/// Returns an error if an input cannot be found or a manifest cannot be
/// parsed. Handler-level failures are reported in the [`BuildOutcome`].
pub fn build_manifest_files(
    inputs: &[PathBuf],
    config: &BuildConfig,
    version: &str,
) -> Result<BuildOutcome, BuildError> {
    let paths = manifest::collect_manifest_paths(inputs)?;
    tracing::debug!(manifests = paths.len(), "Loading handler manifests");
    let handlers = manifest::load_handlers(&paths)?;
    build_handlers(&handlers, config, version)
}
