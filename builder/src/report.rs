//! Structured build reporting.

use handler_schema_core::SchemaError;
use serde::{Deserialize, Serialize};

/// Structured failure code for handlers that produced no schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    /// A handler or parameter name could not be normalized.
    InvalidSchemaInput,
    /// Two parameters collided after normalization.
    DuplicateParameterName,
    /// The handler had no stable identity.
    MissingHandlerIdentity,
    /// Another handler in the same run already used this identity.
    DuplicateHandler,
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSchemaInput => write!(f, "invalid_schema_input"),
            Self::DuplicateParameterName => write!(f, "duplicate_parameter_name"),
            Self::MissingHandlerIdentity => write!(f, "missing_handler_identity"),
            Self::DuplicateHandler => write!(f, "duplicate_handler"),
        }
    }
}

impl From<&SchemaError> for FailureCode {
    fn from(err: &SchemaError) -> Self {
        match err {
            SchemaError::InvalidSchemaInput(_) => Self::InvalidSchemaInput,
            SchemaError::DuplicateParameterName(_) => Self::DuplicateParameterName,
            SchemaError::MissingHandlerIdentity(_) => Self::MissingHandlerIdentity,
        }
    }
}

/// Per-handler build report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Handler identity, or its simple name when the identity is missing.
    pub handler: String,
    pub success: bool,
    /// Structured failure code when the build did not succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<FailureCode>,
    /// Human-readable detail about the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_detail: Option<String>,
    pub options: usize,
    pub arguments: usize,
    pub services: usize,
    /// Markers that were ignored, as `<detail>: <tag>`.
    pub unrecognized_markers: Vec<String>,
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub(crate) fn failed(handler: &str, code: FailureCode, detail: String) -> Self {
        Self {
            handler: handler.to_string(),
            success: false,
            failure_code: Some(code),
            failure_detail: Some(detail),
            options: 0,
            arguments: 0,
            services: 0,
            unrecognized_markers: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Batch report for a full build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReportBundle {
    /// Schema contract version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    pub generated_at: String,
    pub version: String,
    pub reports: Vec<BuildReport>,
    pub failures: Vec<String>,
}
