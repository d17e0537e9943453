//! Schema type definitions for handler metadata.
//!
//! A [`Detail`] carries everything known about one command or one handler
//! parameter. A [`CommandSchema`] groups the command's own detail with the
//! details of its parameters. Both types serialize with [`serde`] so the
//! finished model can be handed to any downstream generator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::capitalize;
use crate::error::{Result, SchemaError};
use crate::merge::{self, merge_field};

/// Version of the schema contract (semver).
///
/// Embedded in every [`SchemaPackage`](crate::SchemaPackage) to track
/// compatibility between producers and consumers.
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Reserved lookup key that resolves to the command's own detail in
/// [`CommandSchema::detail`].
pub const COMMAND_KEY: &str = "__commandKey__";

/// How a handler parameter is surfaced on the command line.
///
/// # Examples
///
/// ```
/// use handler_schema_core::MemberKind;
///
/// assert_eq!(MemberKind::default(), MemberKind::Option);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Named option (`--retries 3`), the default.
    #[default]
    Option,
    /// Positional argument.
    Argument,
    /// Dependency supplied by the hosting environment, never parsed.
    Service,
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Option => write!(f, "option"),
            Self::Argument => write!(f, "argument"),
            Self::Service => write!(f, "service"),
        }
    }
}

/// Canonical metadata record for one command or one parameter.
///
/// The identifier is fixed at creation. Every other field is refined in
/// place through setters that apply the merge rules, so a value can only
/// become more specific:
///
/// - blank descriptions, type names and display names are ignored;
/// - `kind` never returns to [`MemberKind::Option`] once changed;
/// - `required` never returns to `false` once set.
///
/// # Examples
///
/// ```
/// use handler_schema_core::{Detail, MemberKind};
///
/// let mut detail = Detail::new("Build#retries", "retries", Some("int")).unwrap();
/// assert_eq!(detail.name(), "Retries");
///
/// detail.set_required(true);
/// detail.set_required(false);
/// assert!(detail.required());
///
/// detail.set_kind(MemberKind::Argument);
/// detail.set_kind(MemberKind::Option);
/// assert_eq!(detail.kind(), MemberKind::Argument);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    kind: MemberKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arg_display_name: Option<String>,
    #[serde(default)]
    required: bool,
}

impl Detail {
    /// Creates a detail with a capitalized display name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchemaInput`] if `name` is blank.
    pub fn new(id: impl Into<String>, name: &str, type_name: Option<&str>) -> Result<Self> {
        let id = id.into();
        let name = capitalize(name).ok_or_else(|| {
            SchemaError::InvalidSchemaInput(format!("empty name for detail '{id}'"))
        })?;
        let mut detail = Self {
            id,
            name,
            description: String::new(),
            aliases: Vec::new(),
            kind: MemberKind::Option,
            type_name: None,
            arg_display_name: None,
            required: false,
        };
        if let Some(type_name) = type_name {
            detail.set_type_name(type_name);
        }
        Ok(detail)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn arg_display_name(&self) -> Option<&str> {
        self.arg_display_name.as_deref()
    }

    pub fn required(&self) -> bool {
        self.required
    }

    /// Replaces the display name. Unlike the other fields, the name is not
    /// monotonic, but it can never become blank.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        merge_field(&mut self.name, name.into(), merge::has_text)
    }

    /// Sets the description unless `description` is blank.
    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        merge_field(&mut self.description, description.into(), merge::has_text)
    }

    /// Replaces the alias list wholesale, including with an empty list.
    pub fn set_aliases(&mut self, aliases: Vec<String>) -> bool {
        merge_field(&mut self.aliases, aliases, merge::always)
    }

    /// Refines the kind; [`MemberKind::Option`] writes are ignored.
    pub fn set_kind(&mut self, kind: MemberKind) -> bool {
        merge_field(&mut self.kind, kind, merge::is_refined_kind)
    }

    /// Sets the type name unless `type_name` is empty.
    pub fn set_type_name(&mut self, type_name: impl Into<String>) -> bool {
        merge_field(&mut self.type_name, Some(type_name.into()), merge::has_some_text)
    }

    /// Sets the value placeholder unless `display_name` is empty.
    pub fn set_arg_display_name(&mut self, display_name: impl Into<String>) -> bool {
        merge_field(
            &mut self.arg_display_name,
            Some(display_name.into()),
            merge::has_some_text,
        )
    }

    /// Marks the detail as required; `false` writes are ignored.
    pub fn set_required(&mut self, required: bool) -> bool {
        merge_field(&mut self.required, required, merge::is_set)
    }
}

/// Complete schema for one handler.
///
/// Produced by [`assemble_command`](crate::assemble_command). The schema owns
/// the command's detail and one detail per parameter, keyed by the declared
/// parameter name.
///
/// # Examples
///
/// ```
/// use handler_schema_core::*;
///
/// let handler = HandlerDescription::new("App.Build()", "build", "App")
///     .with_parameter(ParameterDescription::new("configArg", "string"))
///     .with_parameter(ParameterDescription::new("retries", "int"));
///
/// let schema = assemble_command(&handler).unwrap();
/// assert_eq!(schema.command_detail.name(), "Build");
/// assert_eq!(schema.arguments()[0].name(), "Config");
/// assert_eq!(schema.options()[0].name(), "Retries");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Logical grouping of the handler (e.g. its containing namespace).
    pub namespace: String,
    /// Detail describing the command itself.
    pub command_detail: Detail,
    /// Parameter details keyed by declared parameter name.
    pub member_details: BTreeMap<String, Detail>,
    /// Declared parameter order.
    #[serde(default)]
    pub parameter_order: Vec<String>,
    /// Identity of the parent handler when this command is a subcommand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl CommandSchema {
    /// Stable identity of the handler (the command detail's id).
    pub fn id(&self) -> &str {
        self.command_detail.id()
    }

    /// Looks up a member detail by parameter name, or the command detail
    /// for [`COMMAND_KEY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use handler_schema_core::*;
    ///
    /// let handler = HandlerDescription::new("App.Run()", "run", "App")
    ///     .with_parameter(ParameterDescription::new("verbose", "bool"));
    /// let schema = assemble_command(&handler).unwrap();
    ///
    /// assert_eq!(schema.detail(COMMAND_KEY).unwrap().name(), "Run");
    /// assert_eq!(schema.detail("verbose").unwrap().name(), "Verbose");
    /// assert!(schema.detail("missing").is_none());
    /// ```
    pub fn detail(&self, key: &str) -> Option<&Detail> {
        if key == COMMAND_KEY {
            return Some(&self.command_detail);
        }
        self.member_details.get(key)
    }

    /// Member details in declared parameter order.
    pub fn members(&self) -> Vec<&Detail> {
        self.parameter_order
            .iter()
            .filter_map(|key| self.member_details.get(key))
            .collect()
    }

    /// Members surfaced as named options, in declared order.
    pub fn options(&self) -> Vec<&Detail> {
        self.members_of(MemberKind::Option)
    }

    /// Members surfaced as positional arguments, in declared order.
    pub fn arguments(&self) -> Vec<&Detail> {
        self.members_of(MemberKind::Argument)
    }

    /// Members injected by the host, in declared order.
    pub fn services(&self) -> Vec<&Detail> {
        self.members_of(MemberKind::Service)
    }

    fn members_of(&self, kind: MemberKind) -> Vec<&Detail> {
        self.members()
            .into_iter()
            .filter(|detail| detail.kind() == kind)
            .collect()
    }
}
