//! Schema and package validation.
//!
//! Schemas deserialized from disk bypass the assembler, so their invariants
//! have to be re-checked before they are handed to a generator: identities
//! present and unique, member keys consistent with the declared order, and
//! no blank names.
//!
//! # Examples
//!
//! ```
//! use handler_schema_core::*;
//!
//! let handler = HandlerDescription::new("App.Run(int)", "run", "App")
//!     .with_parameter(ParameterDescription::new("count", "int"));
//! let mut schema = assemble_command(&handler).unwrap();
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Order entry with no matching detail
//! schema.parameter_order.push("ghost".into());
//! assert!(!validate_schema(&schema).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandSchema, SchemaPackage};

/// Schema/package validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Package version string is empty.
    #[error("package version cannot be empty")]
    EmptyPackageVersion,
    /// Handler identity is empty or whitespace-only.
    #[error("schema identity cannot be empty")]
    EmptyIdentity,
    /// Command name is empty or whitespace-only.
    #[error("schema command name cannot be empty: {0}")]
    EmptyCommandName(String),
    /// Two schemas in the same package share a handler identity.
    #[error("duplicate handler in package: {0}")]
    DuplicateHandler(String),
    /// Two details in one schema share an id.
    #[error("duplicate detail id in schema: {0}")]
    DuplicateDetailId(String),
    /// A member detail has a blank name.
    #[error("member '{0}' has an empty name")]
    EmptyMemberName(String),
    /// `parameter_order` and `member_details` disagree.
    #[error("parameter order does not match member details at: {0}")]
    MemberOrderMismatch(String),
}

/// Validates a full schema package.
///
/// Checks for an empty version string, duplicate handler identities, and
/// validates each schema individually. Stops at the first failing schema.
pub fn validate_package(package: &SchemaPackage) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if package.version.trim().is_empty() {
        errors.push(ValidationError::EmptyPackageVersion);
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for schema in &package.schemas {
        if !seen.insert(schema.id()) {
            errors.push(ValidationError::DuplicateHandler(schema.id().to_string()));
            return errors;
        }
        errors.extend(validate_schema(schema));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates one command schema.
pub fn validate_schema(schema: &CommandSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let id = schema.id().trim();
    if id.is_empty() {
        errors.push(ValidationError::EmptyIdentity);
        return errors;
    }
    if schema.command_detail.name().trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName(id.to_string()));
        return errors;
    }

    let mut ordered: HashSet<&str> = HashSet::new();
    for key in &schema.parameter_order {
        if !schema.member_details.contains_key(key) || !ordered.insert(key.as_str()) {
            errors.push(ValidationError::MemberOrderMismatch(key.clone()));
            return errors;
        }
    }
    if let Some(key) = schema
        .member_details
        .keys()
        .find(|key| !ordered.contains(key.as_str()))
    {
        errors.push(ValidationError::MemberOrderMismatch(key.clone()));
        return errors;
    }

    let mut ids: HashSet<&str> = HashSet::new();
    ids.insert(id);
    for (key, detail) in &schema.member_details {
        if detail.name().trim().is_empty() {
            errors.push(ValidationError::EmptyMemberName(key.clone()));
            return errors;
        }
        if !ids.insert(detail.id()) {
            errors.push(ValidationError::DuplicateDetailId(detail.id().to_string()));
            return errors;
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerDescription, ParameterDescription, assemble_command};

    fn schema(id: &str) -> CommandSchema {
        assemble_command(
            &HandlerDescription::new(id, "build", "App")
                .with_parameter(ParameterDescription::new("configArg", "string"))
                .with_parameter(ParameterDescription::new("retries", "int")),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_package_rejects_duplicate_handlers() {
        let mut package = SchemaPackage::new("1.0.0", "2026-02-07T00:00:00Z");
        package.schemas.push(schema("App.Build()"));
        package.schemas.push(schema("App.Build()"));

        assert_eq!(
            validate_package(&package),
            vec![ValidationError::DuplicateHandler("App.Build()".to_string())]
        );
    }

    #[test]
    fn test_validate_package_rejects_empty_version() {
        let package = SchemaPackage::new(" ", "2026-02-07T00:00:00Z");
        assert_eq!(
            validate_package(&package),
            vec![ValidationError::EmptyPackageVersion]
        );
    }

    #[test]
    fn test_validate_schema_rejects_unordered_member() {
        let mut schema = schema("App.Build()");
        schema.parameter_order.retain(|key| key != "retries");
        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::MemberOrderMismatch("retries".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_duplicate_detail_ids() {
        let json = serde_json::json!({
            "namespace": "App",
            "command_detail": { "id": "App.Build()", "name": "Build" },
            "member_details": {
                "a": { "id": "same", "name": "A" },
                "b": { "id": "same", "name": "B" }
            },
            "parameter_order": ["a", "b"]
        });
        let schema: CommandSchema = serde_json::from_value(json).unwrap();
        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::DuplicateDetailId("same".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_accepts_assembled_schema() {
        assert!(validate_schema(&schema("App.Build()")).is_empty());
    }
}
