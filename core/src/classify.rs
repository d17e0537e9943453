//! Parameter classification by naming convention and declared type.
//!
//! Rules are evaluated in order, first match wins:
//!
//! 1. a name ending in `Arg` is a positional [`MemberKind::Argument`] and the
//!    suffix is dropped from its display name;
//! 2. an abstract declared type (interface or abstract class) is a
//!    [`MemberKind::Service`];
//! 3. anything else is a [`MemberKind::Option`].

use crate::error::{Result, SchemaError};
use crate::types::MemberKind;

/// Naming suffix that marks a parameter as positional.
pub const ARGUMENT_SUFFIX: &str = "Arg";

/// Initial kind and display name for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: MemberKind,
    pub name: String,
}

/// Classifies a parameter from its declared name and type abstractness.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidSchemaInput`] if `name` is blank, or if it
/// is exactly the argument suffix (which would leave an empty display name).
///
/// # Examples
///
/// ```
/// use handler_schema_core::{classify_parameter, MemberKind};
///
/// let c = classify_parameter("configArg", false).unwrap();
/// assert_eq!(c.kind, MemberKind::Argument);
/// assert_eq!(c.name, "Config");
///
/// // The suffix rule wins over abstractness.
/// let c = classify_parameter("sinkArg", true).unwrap();
/// assert_eq!(c.kind, MemberKind::Argument);
///
/// let c = classify_parameter("logger", true).unwrap();
/// assert_eq!(c.kind, MemberKind::Service);
///
/// let c = classify_parameter("retries", false).unwrap();
/// assert_eq!((c.kind, c.name.as_str()), (MemberKind::Option, "Retries"));
/// ```
pub fn classify_parameter(name: &str, is_abstract: bool) -> Result<Classification> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SchemaError::InvalidSchemaInput(
            "parameter name is empty".to_string(),
        ));
    }

    if let Some(stem) = name.strip_suffix(ARGUMENT_SUFFIX) {
        let name = capitalize(stem).ok_or_else(|| {
            SchemaError::InvalidSchemaInput(format!(
                "parameter '{name}' has no name before the '{ARGUMENT_SUFFIX}' suffix"
            ))
        })?;
        return Ok(Classification {
            kind: MemberKind::Argument,
            name,
        });
    }

    let kind = if is_abstract {
        MemberKind::Service
    } else {
        MemberKind::Option
    };
    let name = capitalize(name)
        .ok_or_else(|| SchemaError::InvalidSchemaInput(format!("invalid parameter '{name}'")))?;
    Ok(Classification { kind, name })
}

/// Upper-cases the first character of `name`; `None` if `name` is blank.
///
/// The mapping is one character to one: a character whose upper case
/// expands to several (e.g. `ß`) is kept as is.
pub(crate) fn capitalize(name: &str) -> Option<String> {
    let name = name.trim();
    let mut chars = name.chars();
    let first = chars.next()?;
    let mut upper = first.to_uppercase();
    let head = match (upper.next(), upper.next()) {
        (Some(mapped), None) => mapped,
        _ => first,
    };
    Some(std::iter::once(head).chain(chars).collect())
}
