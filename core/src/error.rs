//! Error taxonomy for schema construction.
//!
//! Every failure is scoped to a single handler. Callers that build many
//! handlers at once report the error against that handler and keep going.

use thiserror::Error;

/// Errors raised while classifying, merging, or assembling one handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A parameter or handler name cannot be turned into a user-facing name.
    #[error("invalid schema input: {0}")]
    InvalidSchemaInput(String),

    /// Two parameters of the same handler collide after normalization.
    #[error("duplicate parameter name: {0}")]
    DuplicateParameterName(String),

    /// The handler has no stable identity to key its schema by.
    #[error("handler identity is missing for '{0}'")]
    MissingHandlerIdentity(String),
}

impl SchemaError {
    /// Stable snake_case label used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSchemaInput(_) => "invalid_schema_input",
            Self::DuplicateParameterName(_) => "duplicate_parameter_name",
            Self::MissingHandlerIdentity(_) => "missing_handler_identity",
        }
    }
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
