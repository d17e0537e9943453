//! Monotonic merge of metadata onto [`Detail`] records.
//!
//! Metadata arrives from several sources: naming conventions, documentation
//! text, and declarative markers. Every field write goes through
//! [`merge_field`], which only accepts the incoming value when the field's
//! rule considers it more specific:
//!
//! | Field | Accepted when |
//! |---|---|
//! | description | incoming is not blank |
//! | aliases | always (an explicit empty list still replaces) |
//! | kind | incoming is not [`MemberKind::Option`] |
//! | type name, value placeholder | incoming is not empty |
//! | required | incoming is `true` |
//!
//! # Example
//!
//! ```
//! use handler_schema_core::*;
//!
//! let mut detail = Detail::new("Build#retries", "retries", Some("int")).unwrap();
//! apply_markers(&mut detail, &[Marker::new("Required"), Marker::new("Obsolete")]);
//! detail.merge(&DetailPatch { required: Some(false), ..Default::default() });
//!
//! assert!(detail.required());
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::marker::Marker;
use crate::types::{Detail, MemberKind};

/// Writes `incoming` into `current` if `is_more_specific` accepts it.
///
/// Returns whether the field was written.
///
/// # Examples
///
/// ```
/// use handler_schema_core::merge_field;
///
/// let mut required = false;
/// assert!(merge_field(&mut required, true, |v| *v));
/// assert!(!merge_field(&mut required, false, |v| *v));
/// assert!(required);
/// ```
pub fn merge_field<T>(current: &mut T, incoming: T, is_more_specific: impl FnOnce(&T) -> bool) -> bool {
    if is_more_specific(&incoming) {
        *current = incoming;
        true
    } else {
        false
    }
}

pub(crate) fn has_text(value: &String) -> bool {
    !value.trim().is_empty()
}

pub(crate) fn has_some_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

pub(crate) fn is_refined_kind(kind: &MemberKind) -> bool {
    *kind != MemberKind::Option
}

pub(crate) fn is_set(flag: &bool) -> bool {
    *flag
}

pub(crate) fn always<T>(_: &T) -> bool {
    true
}

/// A set of candidate field writes from one metadata source.
///
/// `None` means the source says nothing about that field. `Some` values
/// still pass through the field's merge rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPatch {
    pub description: Option<String>,
    pub aliases: Option<Vec<String>>,
    pub kind: Option<MemberKind>,
    pub type_name: Option<String>,
    pub arg_display_name: Option<String>,
    pub required: Option<bool>,
}

impl Detail {
    /// Applies every field of `patch` under the merge rules.
    ///
    /// Returns `true` if any field was written.
    pub fn merge(&mut self, patch: &DetailPatch) -> bool {
        let mut changed = false;
        if let Some(description) = &patch.description {
            changed |= self.set_description(description.clone());
        }
        if let Some(aliases) = &patch.aliases {
            changed |= self.set_aliases(aliases.clone());
        }
        if let Some(kind) = patch.kind {
            changed |= self.set_kind(kind);
        }
        if let Some(type_name) = &patch.type_name {
            changed |= self.set_type_name(type_name.clone());
        }
        if let Some(display_name) = &patch.arg_display_name {
            changed |= self.set_arg_display_name(display_name.clone());
        }
        if let Some(required) = patch.required {
            changed |= self.set_required(required);
        }
        changed
    }
}

/// Free-text documentation for one handler.
///
/// `summary` documents the command itself; `params` documents parameters
/// by declared name.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Documentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Documentation {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.params.is_empty()
    }
}

/// Layers documentation text onto a command detail and its members.
///
/// Text is trimmed before merging. Entries for parameters that are not in
/// `members` are ignored.
pub fn apply_documentation(
    docs: &Documentation,
    command: &mut Detail,
    members: &mut BTreeMap<String, Detail>,
) {
    if let Some(summary) = &docs.summary {
        command.set_description(summary.trim());
    }
    for (param, text) in &docs.params {
        match members.get_mut(param) {
            Some(detail) => {
                detail.set_description(text.trim());
            }
            None => debug!(param = %param, "Ignoring documentation for undeclared parameter"),
        }
    }
}

/// Applies markers to one detail in order.
///
/// Unrecognized markers are skipped; their tags are returned so callers can
/// report them.
pub fn apply_markers(detail: &mut Detail, markers: &[Marker]) -> Vec<String> {
    let mut unrecognized = Vec::new();
    for marker in markers {
        match marker.to_patch() {
            Some(patch) => {
                detail.merge(&patch);
            }
            None => {
                debug!(detail = %detail.id(), marker = %marker.kind, "Ignoring unrecognized marker");
                unrecognized.push(marker.kind.clone());
            }
        }
    }
    unrecognized
}
