//! Core schema model for declaratively described command handlers.
//!
//! A handler is a method that implements one command or subcommand. Each of
//! its parameters becomes an option, a positional argument, or a service
//! injected by the host. This crate turns plain handler descriptions into a
//! normalized model:
//!
//! - [`Detail`]: metadata for one command or parameter, refined in place
//!   under monotonic merge rules.
//! - [`classify_parameter`]: naming-convention and type-based
//!   classification into [`MemberKind`].
//! - [`merge_field`], [`apply_documentation`], [`apply_markers`]: layering
//!   documentation text and declarative [`Marker`]s onto details.
//! - [`assemble_command`]: packaging one [`HandlerDescription`] into a
//!   [`CommandSchema`].
//! - [`build_command_tree`]: linking schemas into a command hierarchy.
//! - [`SchemaPackage`], [`validate_package`]: bundling and checking the
//!   result for the downstream generator.
//!
//! # Example
//!
//! ```
//! use handler_schema_core::*;
//!
//! let handler = HandlerDescription::new("App.Build(string, ILogger, int)", "Build", "App")
//!     .with_parameter(ParameterDescription::new("configArg", "string"))
//!     .with_parameter(ParameterDescription::new("logger", "ILogger").abstract_type())
//!     .with_parameter(
//!         ParameterDescription::new("retries", "int").with_marker(Marker::new("Required")),
//!     )
//!     .with_param_doc("retries", "Number of attempts");
//!
//! let schema = assemble_command(&handler).unwrap();
//! assert_eq!(schema.arguments()[0].name(), "Config");
//! assert_eq!(schema.services()[0].name(), "Logger");
//! assert!(schema.options()[0].required());
//! assert!(validate_schema(&schema).is_empty());
//! ```

mod assemble;
mod classify;
mod error;
mod marker;
mod merge;
mod package;
mod tree;
mod types;
mod validate;

pub use assemble::{
    AssemblyDiagnostics, HandlerDescription, ParameterDescription, assemble_command,
    assemble_command_with_diagnostics,
};
pub use classify::{ARGUMENT_SUFFIX, Classification, classify_parameter};
pub use error::{Result, SchemaError};
pub use marker::{Marker, MarkerKind};
pub use merge::{DetailPatch, Documentation, apply_documentation, apply_markers, merge_field};
pub use package::SchemaPackage;
pub use tree::{CommandNode, TreeError, build_command_tree};
pub use types::*;
pub use validate::{ValidationError, validate_package, validate_schema};
