//! Output formatting for schemas, packages, reports, and command trees.

use handler_schema_core::{CommandNode, CommandSchema, Detail, SchemaPackage};
use serde::{Deserialize, Serialize};

use crate::report::{BuildReport, BuildReportBundle};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
    Table,
}

impl OutputFormat {
    /// File extension used when writing this format to disk.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "md",
            Self::Table => "txt",
        }
    }
}

/// Formats a schema in the requested output format.
pub fn format_schema(schema: &CommandSchema, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(schema)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(schema).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(schema_to_markdown(schema)),
        OutputFormat::Table => Ok(schema_to_table(schema)),
    }
}

/// Formats a whole package. Markdown and table output concatenate the
/// per-schema renderings.
pub fn format_package(package: &SchemaPackage, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(package)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(package).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown | OutputFormat::Table => {
            let mut out = String::new();
            for schema in &package.schemas {
                out.push_str(&format_schema(schema, format)?);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Formats a build report in the requested output format.
pub fn format_report(report: &BuildReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// Formats a report bundle; markdown and table list each report.
pub fn format_report_bundle(
    bundle: &BuildReportBundle,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(bundle)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(bundle).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown | OutputFormat::Table => {
            let mut out = String::new();
            for report in &bundle.reports {
                out.push_str(&format_report(report, format)?);
            }
            Ok(out)
        }
    }
}

/// Renders command trees as an indented outline.
///
/// # Examples
///
/// ```
/// use handler_schema_builder::output::render_tree;
/// use handler_schema_core::*;
///
/// let schemas = vec![
///     assemble_command(&HandlerDescription::new("App.Root()", "app", "App")).unwrap(),
///     assemble_command(&HandlerDescription::new("App.Build()", "build", "App").with_parent("App.Root()"))
///         .unwrap(),
/// ];
/// let roots = build_command_tree(&schemas).unwrap();
/// assert_eq!(render_tree(&roots), "App\n  Build\n");
/// ```
pub fn render_tree(roots: &[CommandNode<'_>]) -> String {
    let mut out = String::new();
    for root in roots {
        render_node(root, 0, &mut out);
    }
    out
}

fn render_node(node: &CommandNode<'_>, depth: usize, out: &mut String) {
    let detail = &node.schema.command_detail;
    out.push_str(&"  ".repeat(depth));
    out.push_str(detail.name());
    if !detail.aliases().is_empty() {
        out.push_str(&format!(" ({})", detail.aliases().join(", ")));
    }
    if !detail.description().is_empty() {
        out.push_str(&format!(" - {}", detail.description()));
    }
    out.push('\n');
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}

fn member_label(detail: &Detail) -> String {
    let mut label = detail.name().to_string();
    if let Some(display) = detail.arg_display_name() {
        label.push_str(&format!(" <{display}>"));
    }
    if !detail.aliases().is_empty() {
        label.push_str(&format!(" ({})", detail.aliases().join(", ")));
    }
    label
}

fn schema_to_markdown(schema: &CommandSchema) -> String {
    let mut out = String::new();
    let command = &schema.command_detail;

    out.push_str(&format!("# {}\n\n", command.name()));

    if !command.description().is_empty() {
        out.push_str(&format!("{}\n\n", command.description()));
    }

    out.push_str(&format!("**Handler:** `{}`\n\n", schema.id()));
    if !schema.namespace.is_empty() {
        out.push_str(&format!("**Namespace:** {}\n\n", schema.namespace));
    }
    if !command.aliases().is_empty() {
        out.push_str(&format!("**Aliases:** {}\n\n", command.aliases().join(", ")));
    }

    let arguments = schema.arguments();
    if !arguments.is_empty() {
        out.push_str("## Arguments\n\n");
        out.push_str("| Argument | Type | Required | Description |\n");
        out.push_str("|----------|------|----------|-------------|\n");
        for arg in arguments {
            let required = if arg.required() { "yes" } else { "no" };
            out.push_str(&format!(
                "| `{}` | {} | {required} | {} |\n",
                member_label(arg),
                arg.type_name().unwrap_or(""),
                arg.description()
            ));
        }
        out.push('\n');
    }

    let options = schema.options();
    if !options.is_empty() {
        out.push_str("## Options\n\n");
        out.push_str("| Option | Type | Required | Description |\n");
        out.push_str("|--------|------|----------|-------------|\n");
        for opt in options {
            let required = if opt.required() { "yes" } else { "no" };
            out.push_str(&format!(
                "| `{}` | {} | {required} | {} |\n",
                member_label(opt),
                opt.type_name().unwrap_or(""),
                opt.description()
            ));
        }
        out.push('\n');
    }

    let services = schema.services();
    if !services.is_empty() {
        out.push_str("## Services\n\n");
        for service in services {
            out.push_str(&format!(
                "- `{}`: {}\n",
                service.name(),
                service.type_name().unwrap_or("")
            ));
        }
        out.push('\n');
    }

    out
}

fn schema_to_table(schema: &CommandSchema) -> String {
    let mut out = String::new();
    let command = &schema.command_detail;

    out.push_str(&format!("Command: {}  Handler: {}", command.name(), schema.id()));
    if let Some(parent) = &schema.parent {
        out.push_str(&format!("  Parent: {parent}"));
    }
    out.push('\n');

    if !command.description().is_empty() {
        out.push_str(&format!("  {}\n", command.description()));
    }

    for (title, members) in [
        ("Arguments", schema.arguments()),
        ("Options", schema.options()),
        ("Services", schema.services()),
    ] {
        if members.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{title}:\n"));
        let labels: Vec<String> = members.iter().map(|d| member_label(d)).collect();
        let max_name = labels.iter().map(String::len).max().unwrap_or(4);
        for (label, detail) in labels.iter().zip(&members) {
            let marker = if detail.required() { "*" } else { " " };
            out.push_str(&format!(
                "  {marker}{:<width$}  {}\n",
                label,
                detail.description(),
                width = max_name
            ));
        }
    }

    out
}

fn report_to_markdown(report: &BuildReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Build Report: {}\n\n", report.handler));
    out.push_str(&format!(
        "- **Success:** {}\n",
        if report.success { "yes" } else { "no" }
    ));
    out.push_str(&format!(
        "- **Members:** {} option(s), {} argument(s), {} service(s)\n",
        report.options, report.arguments, report.services
    ));

    if let Some(ref code) = report.failure_code {
        out.push_str(&format!("- **Failure Code:** {code}\n"));
    }
    if let Some(ref detail) = report.failure_detail {
        out.push_str(&format!("- **Failure Detail:** {detail}\n"));
    }

    if !report.unrecognized_markers.is_empty() {
        out.push_str("\n## Ignored Markers\n\n");
        for marker in &report.unrecognized_markers {
            out.push_str(&format!("- {marker}\n"));
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for w in &report.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}

fn report_to_table(report: &BuildReport) -> String {
    let mut out = String::new();
    let status = if report.success { "OK" } else { "FAIL" };
    out.push_str(&format!(
        "{:<40} {:<6} opt={} arg={} svc={}",
        report.handler, status, report.options, report.arguments, report.services,
    ));
    if let Some(ref code) = report.failure_code {
        out.push_str(&format!("  [{code}]"));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::FailureCode;
    use handler_schema_core::{HandlerDescription, Marker, ParameterDescription, assemble_command};

    fn sample_schema() -> CommandSchema {
        let handler = HandlerDescription::new("App.Build(string, ILogger, int)", "build", "App")
            .with_summary("Build the project")
            .with_parameter(ParameterDescription::new("configArg", "string"))
            .with_parameter(ParameterDescription::new("logger", "ILogger").abstract_type())
            .with_parameter(
                ParameterDescription::new("retries", "int")
                    .with_marker(Marker::new("Required"))
                    .with_marker(Marker::new("OptionArgumentName").with_value("COUNT")),
            )
            .with_param_doc("retries", "Number of attempts");
        assemble_command(&handler).unwrap()
    }

    fn sample_report() -> BuildReport {
        BuildReport {
            handler: "App.Build()".to_string(),
            success: true,
            failure_code: None,
            failure_detail: None,
            options: 1,
            arguments: 1,
            services: 1,
            unrecognized_markers: vec!["Build: Obsolete".to_string()],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_format_schema_json() {
        let json = format_schema(&sample_schema(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"namespace\": \"App\""));
        assert!(json.contains("\"kind\": \"argument\""));
    }

    #[test]
    fn test_format_schema_yaml() {
        let yaml = format_schema(&sample_schema(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("namespace: App"));
    }

    #[test]
    fn test_format_schema_markdown() {
        let md = format_schema(&sample_schema(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("# Build"));
        assert!(md.contains("Build the project"));
        assert!(md.contains("## Arguments"));
        assert!(md.contains("`Config`"));
        assert!(md.contains("`Retries <COUNT>` | int | yes | Number of attempts"));
        assert!(md.contains("- `Logger`: ILogger"));
    }

    #[test]
    fn test_format_schema_table_marks_required() {
        let table = format_schema(&sample_schema(), OutputFormat::Table).unwrap();
        assert!(table.contains("Command: Build"));
        assert!(table.contains("*Retries <COUNT>"));
        assert!(table.contains("Services:"));
    }

    #[test]
    fn test_format_package_table_concatenates() {
        let mut package = SchemaPackage::new("1.0.0", "now");
        package.schemas.push(sample_schema());
        package.schemas.push(sample_schema());
        let table = format_package(&package, OutputFormat::Table).unwrap();
        assert_eq!(table.matches("Command: Build").count(), 2);
    }

    #[test]
    fn test_format_report_markdown() {
        let md = format_report(&sample_report(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("# Build Report: App.Build()"));
        assert!(md.contains("**Success:** yes"));
        assert!(md.contains("Build: Obsolete"));
    }

    #[test]
    fn test_format_report_table_failure() {
        let mut report = sample_report();
        report.success = false;
        report.failure_code = Some(FailureCode::DuplicateParameterName);
        let table = format_report(&report, OutputFormat::Table).unwrap();
        assert!(table.contains("FAIL"));
        assert!(table.contains("[duplicate_parameter_name]"));
    }

    #[test]
    fn test_output_format_deserializes_lowercase() {
        let format: OutputFormat = serde_yaml::from_str("markdown").unwrap();
        assert_eq!(format, OutputFormat::Markdown);
        assert_eq!(format.extension(), "md");
    }
}
