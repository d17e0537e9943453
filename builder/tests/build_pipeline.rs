use std::fs;
use std::path::{Path, PathBuf};

use handler_schema_builder::batch::build_report_bundle;
use handler_schema_builder::config::BuildConfig;
use handler_schema_builder::manifest::load_package;
use handler_schema_builder::output::{OutputFormat, format_package, render_tree};
use handler_schema_builder::report::FailureCode;
use handler_schema_builder::build_manifest_files;
use handler_schema_core::{MemberKind, SchemaPackage, build_command_tree, validate_package};

const APP_MANIFEST: &str = r#"
source: demo-app
handlers:
  - identity: "App.Commands.Build(string, ILogger, int)"
    name: Build
    namespace: App.Commands
    return_type: int
    parameters:
      - { name: configArg, type_name: string }
      - { name: logger, type_name: ILogger, is_abstract: true }
      - name: retries
        type_name: int
        markers:
          - kind: RequiredAttribute
    documentation:
      params:
        retries: Number of attempts
    markers:
      - kind: Aliases
        values: [b]
  - identity: "App.Commands.Build.Watch(bool)"
    name: Watch
    namespace: App.Commands
    parent: "App.Commands.Build(string, ILogger, int)"
    doc_comment: |
      /// <summary>
      ///   Rebuild on change
      /// </summary>
      /// <param name="poll">Poll instead of using file events</param>
    parameters:
      - { name: poll, type_name: bool }
"#;

const BROKEN_MANIFEST: &str = r#"{
  "handlers": [
    { "identity": "", "name": "Orphan" },
    {
      "identity": "App.Commands.Clean(int, int)",
      "name": "Clean",
      "parameters": [
        { "name": "depth", "type_name": "int" },
        { "name": "depth", "type_name": "int" }
      ]
    }
  ]
}"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

#[test]
fn test_yaml_manifest_builds_worked_example() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "app.yaml", APP_MANIFEST);

    let outcome = build_manifest_files(&[path], &BuildConfig::default(), "1.0.0").unwrap();
    assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
    assert_eq!(outcome.package.schema_count(), 2);

    let build = outcome
        .package
        .find("App.Commands.Build(string, ILogger, int)")
        .expect("build schema");
    assert_eq!(build.command_detail.aliases(), ["b"]);

    let config = &build.member_details["configArg"];
    assert_eq!(config.kind(), MemberKind::Argument);
    assert_eq!(config.name(), "Config");
    assert_eq!(build.member_details["logger"].kind(), MemberKind::Service);

    let retries = &build.member_details["retries"];
    assert_eq!(retries.kind(), MemberKind::Option);
    assert_eq!(retries.name(), "Retries");
    assert!(retries.required());
    assert_eq!(retries.description(), "Number of attempts");

    let watch = outcome
        .package
        .find("App.Commands.Build.Watch(bool)")
        .expect("watch schema");
    assert_eq!(watch.command_detail.description(), "Rebuild on change");
    assert_eq!(
        watch.member_details["poll"].description(),
        "Poll instead of using file events"
    );
}

#[test]
fn test_failures_in_one_manifest_do_not_block_another() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.yaml", APP_MANIFEST);
    write(dir.path(), "broken.json", BROKEN_MANIFEST);

    let outcome = build_manifest_files(
        &[dir.path().to_path_buf()],
        &BuildConfig::default(),
        "1.0.0",
    )
    .unwrap();

    assert_eq!(outcome.package.schema_count(), 2);
    assert_eq!(outcome.failures.len(), 2);
    assert!(validate_package(&outcome.package).is_empty());

    let codes: Vec<_> = outcome
        .reports
        .iter()
        .filter_map(|report| report.failure_code)
        .collect();
    assert!(codes.contains(&FailureCode::MissingHandlerIdentity));
    assert!(codes.contains(&FailureCode::DuplicateParameterName));

    let bundle = build_report_bundle("1.0.0", outcome.reports, outcome.failures);
    assert_eq!(bundle.reports.len(), 4);
}

#[test]
fn test_written_package_reloads_and_links_into_tree() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write(dir.path(), "app.yaml", APP_MANIFEST);

    let outcome = build_manifest_files(&[manifest], &BuildConfig::default(), "1.0.0").unwrap();
    let raw = format_package(&outcome.package, OutputFormat::Json).unwrap();
    let package_path = write(dir.path(), "package.json", &raw);

    let loaded: SchemaPackage = load_package(&package_path).unwrap();
    assert_eq!(loaded, outcome.package);
    assert_eq!(loaded.bundle_hash, Some(loaded.content_hash().unwrap()));

    let roots = build_command_tree(&loaded.schemas).unwrap();
    assert_eq!(roots.len(), 1);
    assert!(roots[0].find_subcommand("watch").is_some());

    let rendered = render_tree(&roots);
    assert!(rendered.starts_with("Build (b)"));
    assert!(rendered.contains("\n  Watch - Rebuild on change"));
}

#[test]
fn test_rebuilding_yields_same_bundle_hash() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write(dir.path(), "app.yaml", APP_MANIFEST);
    let inputs = [manifest];

    let first = build_manifest_files(&inputs, &BuildConfig::default(), "1.0.0").unwrap();
    let second = build_manifest_files(&inputs, &BuildConfig::default(), "1.0.0").unwrap();
    assert_eq!(first.package.bundle_hash, second.package.bundle_hash);
    assert_eq!(first.package.schemas, second.package.schemas);
}
