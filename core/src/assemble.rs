//! Command assembly from handler descriptions.
//!
//! A [`HandlerDescription`] is the plain input produced by whatever discovers
//! handler methods. [`assemble_command`] runs classification, documentation
//! and markers over it, in that order, and packages the result as one
//! [`CommandSchema`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::classify::classify_parameter;
use crate::error::{Result, SchemaError};
use crate::marker::Marker;
use crate::merge::{Documentation, apply_documentation, apply_markers};
use crate::types::{CommandSchema, Detail, MemberKind};

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescription {
    /// Declared parameter name (e.g. `configArg`).
    pub name: String,
    /// Declared type name as written by the discovery collaborator.
    #[serde(default)]
    pub type_name: String,
    /// Whether the declared type is an interface or abstract class.
    #[serde(default)]
    pub is_abstract: bool,
    /// Markers attached to this parameter, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
}

impl ParameterDescription {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_abstract: false,
            markers: Vec::new(),
        }
    }

    /// Marks the declared type as abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }
}

/// Everything known about one handler method before assembly.
///
/// # Examples
///
/// ```
/// use handler_schema_core::*;
///
/// let handler = HandlerDescription::new("App.Commands.Build(string)", "Build", "App.Commands")
///     .with_return_type("int")
///     .with_parameter(ParameterDescription::new("configArg", "string"))
///     .with_summary("Build the project");
///
/// assert_eq!(handler.parameters.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDescription {
    /// Fully-qualified, stable identity of the handler.
    pub identity: String,
    /// Simple method name.
    pub name: String,
    /// Containing namespace.
    #[serde(default)]
    pub namespace: String,
    /// Declared return type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Identity of the parent handler, for subcommands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescription>,
    #[serde(default, skip_serializing_if = "Documentation::is_empty")]
    pub documentation: Documentation,
    /// Markers attached to the handler itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
}

impl HandlerDescription {
    pub fn new(
        identity: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescription) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.documentation.summary = Some(summary.into());
        self
    }

    pub fn with_param_doc(mut self, param: impl Into<String>, text: impl Into<String>) -> Self {
        self.documentation.params.insert(param.into(), text.into());
        self
    }

    /// Label used in logs and reports: the trimmed identity, or the name
    /// when the identity is missing.
    pub fn label(&self) -> &str {
        let identity = self.identity.trim();
        if identity.is_empty() {
            self.name.trim()
        } else {
            identity
        }
    }
}

/// Non-fatal observations collected while assembling one handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyDiagnostics {
    /// Marker tags that were ignored, prefixed with the detail they were on.
    pub unrecognized_markers: Vec<String>,
}

/// Assembles one handler into a [`CommandSchema`].
///
/// # Errors
///
/// - [`SchemaError::MissingHandlerIdentity`] if the identity is blank.
/// - [`SchemaError::InvalidSchemaInput`] if the handler name or a parameter
///   name is unusable.
/// - [`SchemaError::DuplicateParameterName`] if two parameters collide.
///
/// # Examples
///
/// ```
/// use handler_schema_core::*;
///
/// let handler = HandlerDescription::new("App.Build(string, ILogger, int)", "Build", "App")
///     .with_parameter(ParameterDescription::new("configArg", "string"))
///     .with_parameter(ParameterDescription::new("logger", "ILogger").abstract_type())
///     .with_parameter(
///         ParameterDescription::new("retries", "int").with_marker(Marker::new("Required")),
///     )
///     .with_param_doc("retries", "Number of attempts");
///
/// let schema = assemble_command(&handler).unwrap();
/// let retries = &schema.member_details["retries"];
/// assert_eq!(retries.kind(), MemberKind::Option);
/// assert!(retries.required());
/// assert_eq!(retries.description(), "Number of attempts");
/// assert_eq!(schema.member_details["logger"].kind(), MemberKind::Service);
/// ```
pub fn assemble_command(handler: &HandlerDescription) -> Result<CommandSchema> {
    assemble_command_with_diagnostics(handler).map(|(schema, _)| schema)
}

/// Like [`assemble_command`], also returning [`AssemblyDiagnostics`].
pub fn assemble_command_with_diagnostics(
    handler: &HandlerDescription,
) -> Result<(CommandSchema, AssemblyDiagnostics)> {
    let identity = handler.identity.trim();
    if identity.is_empty() {
        return Err(SchemaError::MissingHandlerIdentity(handler.name.clone()));
    }

    let mut command_detail = Detail::new(identity, &handler.name, handler.return_type.as_deref())
        .map_err(|_| {
            SchemaError::InvalidSchemaInput(format!("handler '{identity}' has an empty name"))
        })?;

    let mut member_details = BTreeMap::new();
    let mut parameter_order = Vec::with_capacity(handler.parameters.len());

    for param in &handler.parameters {
        let key = param.name.trim().to_string();
        let classification = classify_parameter(&key, param.is_abstract).map_err(|err| {
            SchemaError::InvalidSchemaInput(format!("handler '{identity}': {err}"))
        })?;

        if member_details.contains_key(&key) {
            return Err(SchemaError::DuplicateParameterName(format!(
                "'{key}' declared twice on '{identity}'"
            )));
        }

        let mut detail = Detail::new(
            format!("{identity}#{key}"),
            &classification.name,
            Some(&param.type_name),
        )?;
        detail.set_kind(classification.kind);

        parameter_order.push(key.clone());
        member_details.insert(key, detail);
    }

    apply_documentation(&handler.documentation, &mut command_detail, &mut member_details);

    let mut diagnostics = AssemblyDiagnostics::default();
    for tag in apply_markers(&mut command_detail, &handler.markers) {
        diagnostics
            .unrecognized_markers
            .push(format!("{}: {tag}", command_detail.name()));
    }
    for param in &handler.parameters {
        if let Some(detail) = member_details.get_mut(param.name.trim()) {
            for tag in apply_markers(detail, &param.markers) {
                diagnostics
                    .unrecognized_markers
                    .push(format!("{}: {tag}", param.name.trim()));
            }
        }
    }

    // Markers can promote a service, so collisions are checked on final kinds.
    let mut display_names: HashMap<String, &str> = HashMap::new();
    for key in &parameter_order {
        let Some(detail) = member_details.get(key) else {
            continue;
        };
        if detail.kind() == MemberKind::Service {
            continue;
        }
        if let Some(previous) = display_names.insert(detail.name().to_lowercase(), key) {
            return Err(SchemaError::DuplicateParameterName(format!(
                "'{previous}' and '{key}' both surface as '{}' on '{identity}'",
                detail.name()
            )));
        }
    }

    let schema = CommandSchema {
        namespace: handler.namespace.clone(),
        command_detail,
        member_details,
        parameter_order,
        parent: handler
            .parent
            .as_deref()
            .map(str::trim)
            .filter(|parent| !parent.is_empty())
            .map(String::from),
    };
    Ok((schema, diagnostics))
}
