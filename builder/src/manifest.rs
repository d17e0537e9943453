//! Handler manifests and schema package files.
//!
//! A manifest is what the discovery collaborator writes after inspecting
//! source code: a list of handler descriptions, optionally carrying a raw
//! XML doc comment per handler. Manifests and packages are read as JSON or
//! YAML depending on the file extension.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use handler_schema_core::{HandlerDescription, SchemaPackage, validate_package};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::doc_comment::{combine_documentation, parse_doc_comment};
use crate::error::BuildError;

/// One handler entry in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestHandler {
    #[serde(flatten)]
    pub handler: HandlerDescription,
    /// Raw XML doc comment attached to the handler method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_comment: Option<String>,
}

impl ManifestHandler {
    /// Returns the handler description with documentation parsed from
    /// `doc_comment` folded in. Explicit documentation wins over the
    /// comment when both are present.
    pub fn resolve(&self) -> HandlerDescription {
        let mut handler = self.handler.clone();
        if let Some(raw) = &self.doc_comment {
            handler.documentation = combine_documentation(parse_doc_comment(raw), &handler.documentation);
        }
        handler
    }
}

impl From<HandlerDescription> for ManifestHandler {
    fn from(handler: HandlerDescription) -> Self {
        Self {
            handler,
            doc_comment: None,
        }
    }
}

/// A file of handler descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerManifest {
    /// Optional name of the assembly or project the handlers came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub handlers: Vec<ManifestHandler>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

fn file_format(path: &Path) -> Option<FileFormat> {
    match path.extension().and_then(OsStr::to_str) {
        Some("json") => Some(FileFormat::Json),
        Some("yaml" | "yml") => Some(FileFormat::Yaml),
        _ => None,
    }
}

fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T, BuildError> {
    let format = file_format(path).ok_or_else(|| {
        BuildError::InvalidInput(format!(
            "Unsupported file extension (expected .json, .yaml, or .yml): {}",
            path.display()
        ))
    })?;
    let raw = fs::read_to_string(path)?;
    let value = match format {
        FileFormat::Json => serde_json::from_str(&raw)?,
        FileFormat::Yaml => serde_yaml::from_str(&raw)?,
    };
    Ok(value)
}

/// Loads one manifest file.
///
/// # Errors
///
/// Returns [`BuildError::InvalidInput`] for unsupported extensions, and
/// I/O or parse errors otherwise.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<HandlerManifest, BuildError> {
    read_structured(path.as_ref())
}

/// Loads several manifests and concatenates their handlers in path order.
pub fn load_handlers(paths: &[PathBuf]) -> Result<Vec<ManifestHandler>, BuildError> {
    let mut handlers = Vec::new();
    for path in paths {
        let manifest = load_manifest(path)?;
        handlers.extend(manifest.handlers);
    }
    Ok(handlers)
}

/// Loads a schema package and validates it.
///
/// # Errors
///
/// Returns [`BuildError::Validation`] if the package violates a schema
/// invariant.
pub fn load_package(path: impl AsRef<Path>) -> Result<SchemaPackage, BuildError> {
    let path = path.as_ref();
    let package: SchemaPackage = read_structured(path)?;
    let errors = validate_package(&package);
    if !errors.is_empty() {
        let details = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(BuildError::Validation(format!(
            "{}: {details}",
            path.display()
        )));
    }
    Ok(package)
}

/// Collects manifest file paths from input files and/or directories.
///
/// Directories contribute their `.json`, `.yaml` and `.yml` files
/// (non-recursive). The result is sorted and deduplicated.
pub fn collect_manifest_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, BuildError> {
    if inputs.is_empty() {
        return Err(BuildError::InvalidInput(
            "No manifest paths were provided".to_string(),
        ));
    }

    let mut paths = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            for entry in fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && file_format(&path).is_some() {
                    paths.insert(path);
                }
            }
            continue;
        }

        if input.is_file() {
            if file_format(input).is_none() {
                return Err(BuildError::InvalidInput(format!(
                    "Manifest file must be JSON or YAML: {}",
                    input.display()
                )));
            }
            paths.insert(input.clone());
            continue;
        }

        return Err(BuildError::InvalidInput(format!(
            "Input path does not exist: {}",
            input.display()
        )));
    }

    if paths.is_empty() {
        return Err(BuildError::InvalidInput(
            "No manifest files found in the provided inputs".to_string(),
        ));
    }

    Ok(paths.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_MANIFEST: &str = r#"
source: demo
handlers:
  - identity: "App.Build(string, int)"
    name: Build
    namespace: App
    return_type: int
    doc_comment: |
      /// <summary>Build the project</summary>
      /// <param name="retries">Number of attempts</param>
    parameters:
      - { name: configArg, type_name: string }
      - name: retries
        type_name: int
        markers:
          - kind: Required
"#;

    #[test]
    fn test_yaml_manifest_flattens_handler_fields() {
        let manifest: HandlerManifest = serde_yaml::from_str(YAML_MANIFEST).unwrap();
        assert_eq!(manifest.source.as_deref(), Some("demo"));
        let entry = &manifest.handlers[0];
        assert_eq!(entry.handler.identity, "App.Build(string, int)");
        assert_eq!(entry.handler.parameters.len(), 2);
        assert_eq!(entry.handler.parameters[1].markers[0].kind, "Required");
        assert!(entry.doc_comment.is_some());
    }

    #[test]
    fn test_resolve_folds_doc_comment_into_documentation() {
        let manifest: HandlerManifest = serde_yaml::from_str(YAML_MANIFEST).unwrap();
        let handler = manifest.handlers[0].resolve();
        assert_eq!(
            handler.documentation.summary.as_deref(),
            Some("Build the project")
        );
        assert_eq!(handler.documentation.params["retries"], "Number of attempts");
    }

    #[test]
    fn test_load_manifest_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handlers.toml");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            load_manifest(&path),
            Err(BuildError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_collect_manifest_paths_filters_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), "handlers: []").unwrap();
        fs::write(dir.path().join("a.json"), "{\"handlers\": []}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let paths = collect_manifest_paths(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .filter_map(|p| p.file_name().and_then(OsStr::to_str))
            .collect();
        assert_eq!(names, vec!["a.json", "b.yaml"]);

        let handlers = load_handlers(&paths).unwrap();
        assert!(handlers.is_empty());
    }

    #[test]
    fn test_collect_manifest_paths_missing_input() {
        let err = collect_manifest_paths(&[PathBuf::from("/definitely/not/here.json")]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
