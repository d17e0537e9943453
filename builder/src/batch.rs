//! Batch schema builds with per-handler failure isolation.
//!
//! Every handler is assembled independently on a rayon pool. A handler that
//! fails produces a failed [`BuildReport`] and is left out of the package;
//! the others are unaffected. Results are sorted by handler identity so the
//! package and reports are identical across runs.

use std::collections::HashSet;

use chrono::Utc;
use handler_schema_core::{
    CommandSchema, HandlerDescription, SCHEMA_CONTRACT_VERSION, SchemaPackage,
    assemble_command_with_diagnostics,
};
use tracing::{debug, info, warn};

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::manifest::ManifestHandler;
use crate::report::{BuildReport, BuildReportBundle, FailureCode};

/// Result of building one handler.
#[derive(Debug, Clone)]
pub struct BuildRun {
    pub schema: Option<CommandSchema>,
    pub report: BuildReport,
}

/// Aggregated output from a batch build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Package containing every successfully built schema.
    pub package: SchemaPackage,
    /// Labels of handlers that failed.
    pub failures: Vec<String>,
    /// Non-fatal warnings, prefixed with the handler label.
    pub warnings: Vec<String>,
    /// Handlers skipped by the configured exclusions.
    pub excluded: Vec<String>,
    /// Per-handler reports, sorted by handler label.
    pub reports: Vec<BuildReport>,
}

/// Builds one handler into a schema and report.
///
/// # Examples
///
/// ```
/// use handler_schema_builder::batch::build_handler;
/// use handler_schema_core::{HandlerDescription, ParameterDescription};
///
/// let run = build_handler(
///     &HandlerDescription::new("App.Run(string)", "run", "App")
///         .with_parameter(ParameterDescription::new("pathArg", "string")),
/// );
/// assert!(run.report.success);
/// assert_eq!(run.report.arguments, 1);
/// ```
pub fn build_handler(handler: &HandlerDescription) -> BuildRun {
    let label = handler.label().to_string();

    match assemble_command_with_diagnostics(handler) {
        Ok((schema, diagnostics)) => {
            let warnings = undeclared_doc_params(handler);
            debug!(
                handler = %label,
                members = schema.member_details.len(),
                ignored_markers = diagnostics.unrecognized_markers.len(),
                "Built handler schema"
            );
            let report = BuildReport {
                handler: label,
                success: true,
                failure_code: None,
                failure_detail: None,
                options: schema.options().len(),
                arguments: schema.arguments().len(),
                services: schema.services().len(),
                unrecognized_markers: diagnostics.unrecognized_markers,
                warnings,
            };
            BuildRun {
                schema: Some(schema),
                report,
            }
        }
        Err(err) => {
            warn!(handler = %label, error = %err, "Handler schema build failed");
            BuildRun {
                schema: None,
                report: BuildReport::failed(&label, FailureCode::from(&err), err.to_string()),
            }
        }
    }
}

fn undeclared_doc_params(handler: &HandlerDescription) -> Vec<String> {
    let declared: HashSet<&str> = handler
        .parameters
        .iter()
        .map(|param| param.name.trim())
        .collect();
    handler
        .documentation
        .params
        .keys()
        .filter(|name| !declared.contains(name.as_str()))
        .map(|name| format!("documentation names undeclared parameter '{name}'"))
        .collect()
}

/// Builds every non-excluded handler and bundles the successes.
///
/// `version` is recorded as the package version.
///
/// # Errors
///
/// Only fails if the finished package cannot be serialized for hashing;
/// per-handler problems are reported in the outcome instead.
pub fn build_handlers(
    handlers: &[ManifestHandler],
    config: &BuildConfig,
    version: &str,
) -> Result<BuildOutcome, BuildError> {
    let mut excluded = Vec::new();
    let selected: Vec<HandlerDescription> = handlers
        .iter()
        .filter_map(|entry| {
            let handler = &entry.handler;
            if config.is_excluded(&handler.identity, &handler.name) {
                debug!(handler = %handler.label(), "Skipping excluded handler");
                excluded.push(handler.label().to_string());
                None
            } else {
                Some(entry.resolve())
            }
        })
        .collect();

    info!(
        handlers = selected.len(),
        excluded = excluded.len(),
        "Building handler schemas"
    );

    let runs = run_parallel(&selected, config.jobs);

    // Input position breaks ties so the first declaration of an identity wins.
    let mut sorted: Vec<(usize, BuildRun)> = runs.into_iter().enumerate().collect();
    sorted.sort_by(|(a_index, a), (b_index, b)| {
        a.report
            .handler
            .cmp(&b.report.handler)
            .then_with(|| a_index.cmp(b_index))
    });

    let mut package = SchemaPackage::new(version, Utc::now().to_rfc3339());
    package.name = config.package.name.clone();
    package.description = config.package.description.clone();

    let mut failures = Vec::new();
    let mut warnings = Vec::new();
    let mut reports = Vec::with_capacity(sorted.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (_, run) in sorted {
        let BuildRun { schema, mut report } = run;
        let label = report.handler.clone();

        match schema {
            Some(schema) if !seen.insert(schema.id().to_string()) => {
                warn!(handler = %label, "Duplicate handler identity");
                report = BuildReport::failed(
                    &label,
                    FailureCode::DuplicateHandler,
                    format!("handler identity '{}' was already built", schema.id()),
                );
                failures.push(label.clone());
            }
            Some(schema) => package.schemas.push(schema),
            None => failures.push(label.clone()),
        }

        warnings.extend(
            report
                .warnings
                .iter()
                .map(|warning| format!("{label}: {warning}")),
        );
        reports.push(report);
    }

    package.seal()?;

    info!(
        built = package.schema_count(),
        failed = failures.len(),
        "Finished handler schema build"
    );

    Ok(BuildOutcome {
        package,
        failures,
        warnings,
        excluded,
        reports,
    })
}

fn run_parallel(handlers: &[HandlerDescription], jobs: Option<usize>) -> Vec<BuildRun> {
    use rayon::prelude::*;

    let jobs = jobs
        .filter(|jobs| *jobs > 0)
        .unwrap_or_else(|| default_parallel_jobs(handlers.len()));

    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(|| handlers.par_iter().map(build_handler).collect()),
        Err(err) => {
            warn!(error = %err, "Failed to build thread pool, building sequentially");
            handlers.iter().map(build_handler).collect()
        }
    }
}

fn default_parallel_jobs(handler_count: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(4);
    cpu_count.min(16).max(1).min(handler_count.max(1))
}

/// Summarizes failure code distribution from build reports.
pub fn failure_code_summary(reports: &[BuildReport]) -> Vec<(FailureCode, usize)> {
    use std::collections::BTreeMap;
    let mut counts: BTreeMap<String, (FailureCode, usize)> = BTreeMap::new();
    for report in reports {
        if let Some(code) = report.failure_code {
            counts
                .entry(code.to_string())
                .and_modify(|(_, count)| *count += 1)
                .or_insert((code, 1));
        }
    }
    counts.into_values().collect()
}

/// Builds a serializable bundle report for a build run.
pub fn build_report_bundle(
    version: &str,
    reports: Vec<BuildReport>,
    failures: Vec<String>,
) -> BuildReportBundle {
    BuildReportBundle {
        schema_version: Some(SCHEMA_CONTRACT_VERSION.to_string()),
        generated_at: Utc::now().to_rfc3339(),
        version: version.to_string(),
        reports,
        failures,
    }
}
