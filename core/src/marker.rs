//! Declarative markers attached to handlers and parameters.
//!
//! A marker is a kind tag plus a list of values, the portable shape of an
//! attribute such as `[Description("...")]` or `[Required]`. Tags are matched
//! by their simple name with or without an `Attribute` suffix, so
//! `Required`, `RequiredAttribute` and `Cli.RequiredAttribute` are the same
//! marker.

use serde::{Deserialize, Serialize};

use crate::merge::DetailPatch;
use crate::types::MemberKind;

const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Marker kinds the merge engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Description,
    Aliases,
    Argument,
    OptionArgumentName,
    Required,
}

impl MarkerKind {
    /// Resolves a marker tag; `None` for tags this engine does not handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use handler_schema_core::MarkerKind;
    ///
    /// assert_eq!(MarkerKind::parse("Required"), Some(MarkerKind::Required));
    /// assert_eq!(MarkerKind::parse("AliasesAttribute"), Some(MarkerKind::Aliases));
    /// assert_eq!(MarkerKind::parse("Obsolete"), None);
    /// ```
    pub fn parse(tag: &str) -> Option<Self> {
        let simple = tag.trim().rsplit('.').next().unwrap_or_default();
        let simple = match simple.strip_suffix(ATTRIBUTE_SUFFIX) {
            Some(stem) if !stem.is_empty() => stem,
            _ => simple,
        };
        match simple {
            "Description" => Some(Self::Description),
            "Aliases" => Some(Self::Aliases),
            "Argument" => Some(Self::Argument),
            "OptionArgumentName" => Some(Self::OptionArgumentName),
            "Required" => Some(Self::Required),
            _ => None,
        }
    }
}

/// One declarative marker as delivered by the discovery collaborator.
///
/// Values are optional because attribute arguments may be null literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Option<String>>,
}

impl Marker {
    /// Creates a presence-only marker.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            values: Vec::new(),
        }
    }

    /// Appends one value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.values.push(Some(value.into()));
        self
    }

    /// Appends several values.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .extend(values.into_iter().map(|value| Some(value.into())));
        self
    }

    /// The recognized kind of this marker, if any.
    pub fn marker_kind(&self) -> Option<MarkerKind> {
        MarkerKind::parse(&self.kind)
    }

    /// Translates the marker into the field writes it implies.
    ///
    /// Presence-only markers use a fixed implicit value: `required = true`
    /// for `Required`, kind [`MemberKind::Argument`] for `Argument`.
    /// Returns `None` for unrecognized markers.
    ///
    /// # Examples
    ///
    /// ```
    /// use handler_schema_core::Marker;
    ///
    /// let patch = Marker::new("Required").to_patch().unwrap();
    /// assert_eq!(patch.required, Some(true));
    ///
    /// let patch = Marker::new("Aliases").with_values(["-r", "--retry"]).to_patch().unwrap();
    /// assert_eq!(patch.aliases, Some(vec!["-r".to_string(), "--retry".to_string()]));
    ///
    /// assert!(Marker::new("Obsolete").to_patch().is_none());
    /// ```
    pub fn to_patch(&self) -> Option<DetailPatch> {
        let patch = match self.marker_kind()? {
            MarkerKind::Description => DetailPatch {
                description: Some(self.first_value()),
                ..Default::default()
            },
            MarkerKind::Aliases => DetailPatch {
                aliases: Some(
                    self.values
                        .iter()
                        .map(|value| value.clone().unwrap_or_default())
                        .collect(),
                ),
                ..Default::default()
            },
            MarkerKind::Argument => DetailPatch {
                kind: Some(MemberKind::Argument),
                ..Default::default()
            },
            MarkerKind::OptionArgumentName => DetailPatch {
                arg_display_name: Some(self.first_value()),
                ..Default::default()
            },
            MarkerKind::Required => DetailPatch {
                required: Some(true),
                ..Default::default()
            },
        };
        Some(patch)
    }

    fn first_value(&self) -> String {
        self.values
            .first()
            .cloned()
            .flatten()
            .unwrap_or_default()
    }
}
