//! XML documentation comment parsing.
//!
//! Discovery collaborators often hand over a handler's raw doc comment
//! instead of pre-split text. This module pulls the handler summary and the
//! per-parameter text out of it:
//!
//! ```text
//! /// <summary>Build the project.</summary>
//! /// <param name="retries">Number of attempts</param>
//! ```
//!
//! Parsing is lenient: unknown elements are ignored, nested markup is
//! flattened to its text, and malformed input yields empty documentation.

use std::sync::LazyLock;

use handler_schema_core::Documentation;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use tracing::debug;

struct DocPatterns {
    comment_prefix: Regex,
    whitespace: Regex,
}

static PATTERNS: LazyLock<DocPatterns> = LazyLock::new(|| DocPatterns {
    comment_prefix: Regex::new(r"(?m)^\s*(?:///|\*)\s?").expect("static regex must compile"),
    whitespace: Regex::new(r"\s+").expect("static regex must compile"),
});

enum Section {
    Summary,
    Param(String),
}

/// Parses a raw XML doc comment into [`Documentation`].
///
/// Leading `///` or `*` comment markers are stripped first. The first
/// `<summary>` and every `<param name="...">` contribute their text content,
/// including nested elements and CDATA, with entities and character
/// references resolved. Whitespace is collapsed and blank entries dropped.
///
/// # Examples
///
/// ```
/// use handler_schema_builder::doc_comment::parse_doc_comment;
///
/// let docs = parse_doc_comment(
///     "/// <summary>Build the project.</summary>\n/// <param name=\"retries\">Number of attempts</param>",
/// );
/// assert_eq!(docs.summary.as_deref(), Some("Build the project."));
/// assert_eq!(docs.params["retries"], "Number of attempts");
/// ```
pub fn parse_doc_comment(raw: &str) -> Documentation {
    let body = PATTERNS.comment_prefix.replace_all(raw, "");
    let wrapped = format!("<doc>{body}</doc>");
    match read_sections(&wrapped) {
        Ok(docs) => docs,
        Err(err) => {
            debug!(error = %err, "Ignoring malformed doc comment");
            Documentation::default()
        }
    }
}

fn read_sections(xml: &str) -> Result<Documentation, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut docs = Documentation::default();
    let mut current: Option<(Section, String)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if current.is_some() {
                    depth += 1;
                    continue;
                }
                current = match start.name().as_ref() {
                    b"summary" => Some((Section::Summary, String::new())),
                    b"param" => {
                        let name = match start.try_get_attribute("name")? {
                            Some(attr) => attr.unescape_value()?.trim().to_string(),
                            None => String::new(),
                        };
                        Some((Section::Param(name), String::new()))
                    }
                    _ => None,
                };
            }
            Event::End(_) => {
                if depth > 0 {
                    depth -= 1;
                } else if let Some((section, text)) = current.take() {
                    store_section(&mut docs, section, &text);
                }
            }
            Event::Text(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(docs)
}

fn store_section(docs: &mut Documentation, section: Section, raw: &str) {
    let text = collapse_whitespace(raw);
    if text.is_empty() {
        return;
    }
    match section {
        Section::Summary => {
            if docs.summary.is_none() {
                docs.summary = Some(text);
            }
        }
        Section::Param(name) if !name.is_empty() => {
            docs.params.insert(name, text);
        }
        Section::Param(_) => {}
    }
}

/// Overlays `explicit` documentation on top of documentation parsed from a
/// doc comment. Non-blank explicit entries win.
pub fn combine_documentation(parsed: Documentation, explicit: &Documentation) -> Documentation {
    let mut combined = parsed;
    if let Some(summary) = explicit
        .summary
        .as_deref()
        .filter(|summary| !summary.trim().is_empty())
    {
        combined.summary = Some(summary.to_string());
    }
    for (name, text) in &explicit.params {
        if !text.trim().is_empty() {
            combined.params.insert(name.clone(), text.clone());
        }
    }
    combined
}

fn collapse_whitespace(text: &str) -> String {
    PATTERNS
        .whitespace
        .replace_all(text.trim(), " ")
        .into_owned()
}
