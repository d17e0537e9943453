use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use handler_schema_builder::batch::{build_report_bundle, failure_code_summary};
use handler_schema_builder::config::BuildConfig;
use handler_schema_builder::manifest::load_package;
use handler_schema_builder::output::{
    OutputFormat, format_package, format_report_bundle, format_schema, render_tree,
};
use handler_schema_builder::build_manifest_files;
use handler_schema_core::{CommandSchema, SchemaPackage, build_command_tree};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "schema-build")]
#[command(about = "Build command schemas from handler manifests")]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a schema package from handler manifest files.
    Build(BuildArgs),
    /// Validate one or more schema package files.
    Validate(ValidateArgs),
    /// Print one handler's schema, or the whole package.
    Inspect(InspectArgs),
    /// Print the command hierarchy of a schema package.
    Tree(TreeArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Manifest files and/or directories containing manifests.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// YAML build configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output path for the package (default: stdout). An existing
    /// directory receives `package.<ext>`.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output path for the per-handler build report. An existing
    /// directory receives `build-report.<ext>`.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Output format (default: from config, else json).
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Number of parallel build jobs.
    #[arg(long)]
    jobs: Option<usize>,
    /// Comma-separated handler identities or names to skip.
    #[arg(long)]
    exclude: Option<String>,
    /// Package name metadata.
    #[arg(long)]
    name: Option<String>,
    /// Package description metadata.
    #[arg(long)]
    description: Option<String>,
    /// Exit with an error if any handler failed to build.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema package files (JSON or YAML).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Schema package file.
    package: PathBuf,
    /// Handler identity or command name to show.
    #[arg(long)]
    handler: Option<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct TreeArgs {
    /// Schema package file.
    package: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Build(args) => run_build(args),
        Command::Validate(args) => run_validate(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Tree(args) => run_tree(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => BuildConfig::default(),
    };
    if args.jobs.is_some() {
        config.jobs = args.jobs;
    }
    config.exclude.extend(parse_csv_list(args.exclude));
    if args.name.is_some() {
        config.package.name = args.name;
    }
    if args.description.is_some() {
        config.package.description = args.description;
    }
    let format = args.format.unwrap_or(config.output.format);
    debug!(?config, ?format, "Resolved build configuration");

    let outcome =
        build_manifest_files(&args.inputs, &config, PACKAGE_VERSION).map_err(|e| e.to_string())?;

    let raw = format_package(&outcome.package, format)?;
    match &args.output {
        Some(path) => {
            let path = resolve_output_path(path, "package", format);
            write_output(&path, &raw)?;
            eprintln!(
                "Built {} schema(s) into '{}'.",
                outcome.package.schema_count(),
                path.display()
            );
        }
        None => print!("{raw}"),
    }

    if !outcome.excluded.is_empty() {
        eprintln!("Skipped {} excluded handler(s).", outcome.excluded.len());
    }
    if !outcome.warnings.is_empty() {
        eprintln!("{} warning(s) emitted during build.", outcome.warnings.len());
        for warning in &outcome.warnings {
            debug!(%warning, "Build warning");
        }
    }

    let failure_count = outcome.failures.len();
    if failure_count > 0 {
        let summary = failure_code_summary(&outcome.reports);
        let breakdown: Vec<String> = summary
            .iter()
            .map(|(code, count)| format!("{count} {code}"))
            .collect();
        eprintln!(
            "{failure_count} build failure(s) ({}): {}",
            breakdown.join(", "),
            outcome.failures.join(", ")
        );
    }

    if let Some(path) = &args.report {
        let bundle = build_report_bundle(PACKAGE_VERSION, outcome.reports, outcome.failures);
        let path = resolve_output_path(path, "build-report", format);
        write_output(&path, &format_report_bundle(&bundle, format)?)?;
    }

    if args.strict && failure_count > 0 {
        return Err(format!("{failure_count} handler(s) failed to build"));
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut schema_count = 0usize;
    for path in &args.inputs {
        let package = load_package(path).map_err(|e| e.to_string())?;
        schema_count += package.schema_count();
    }
    println!(
        "Validated {} package file(s) with {} schema(s).",
        args.inputs.len(),
        schema_count
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let package = load_package(&args.package).map_err(|e| e.to_string())?;
    let output = match &args.handler {
        Some(handler) => {
            let schema = find_handler(&package, handler)
                .ok_or_else(|| format!("No handler named '{handler}' in package"))?;
            format_schema(schema, args.format)?
        }
        None => format_package(&package, args.format)?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

fn run_tree(args: TreeArgs) -> Result<(), String> {
    let package = load_package(&args.package).map_err(|e| e.to_string())?;
    let roots = build_command_tree(&package.schemas).map_err(|e| e.to_string())?;
    print!("{}", render_tree(&roots));
    Ok(())
}

/// Looks up a schema by identity, then by case-insensitive command name.
fn find_handler<'a>(package: &'a SchemaPackage, handler: &str) -> Option<&'a CommandSchema> {
    package.find(handler).or_else(|| {
        package
            .schemas
            .iter()
            .find(|schema| schema.command_detail.name().eq_ignore_ascii_case(handler))
    })
}

/// Expands an existing directory to `<dir>/<stem>.<ext>` for `format`.
fn resolve_output_path(path: &Path, stem: &str, format: OutputFormat) -> PathBuf {
    if path.is_dir() {
        path.join(format!("{stem}.{}", format.extension()))
    } else {
        path.to_path_buf()
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    fs::write(path, contents).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_list() {
        assert_eq!(
            parse_csv_list(Some(" a, ,b,".to_string())),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_csv_list(None).is_empty());
    }

    #[test]
    fn test_resolve_output_path_uses_format_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_output_path(dir.path(), "package", OutputFormat::Markdown),
            dir.path().join("package.md")
        );
        let file = dir.path().join("custom.json");
        assert_eq!(resolve_output_path(&file, "package", OutputFormat::Yaml), file);
    }

    #[test]
    fn test_cli_parses_build_flags() {
        let cli = Cli::try_parse_from([
            "schema-build",
            "--verbose",
            "build",
            "handlers.yaml",
            "--format",
            "yaml",
            "--jobs",
            "2",
            "--strict",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Build(args) = cli.command else {
            panic!("expected build subcommand");
        };
        assert_eq!(args.format, Some(OutputFormat::Yaml));
        assert_eq!(args.jobs, Some(2));
        assert!(args.strict);
    }
}
