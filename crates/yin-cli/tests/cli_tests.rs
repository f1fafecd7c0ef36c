use clap::Parser;
use std::fs;

use yin_cli::args::CliArgs;
use yin_cli::driver;

#[test]
fn parses_defaults() {
    let err = CliArgs::try_parse_from(["yinc"]).expect_err("files are required");
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn parses_files_and_search_dirs() {
    let args = CliArgs::try_parse_from([
        "yinc",
        "-I",
        "/yang/modules",
        "-I",
        "/yang/vendor",
        "-v",
        "a.yin",
        "b.yin",
    ])
    .expect("flagged args should parse");

    assert_eq!(
        args.search_dirs,
        vec![
            std::path::PathBuf::from("/yang/modules"),
            std::path::PathBuf::from("/yang/vendor"),
        ]
    );
    assert!(args.verbose);
    assert_eq!(
        args.files,
        vec![std::path::PathBuf::from("a.yin"), std::path::PathBuf::from("b.yin")]
    );
}

const VALID_MODULE: &str = r#"
<module name="acme-system" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
  <namespace uri="urn:acme:system"/>
  <prefix value="acme"/>
  <container name="system">
    <leaf name="hostname">
      <type name="string"/>
    </leaf>
  </container>
</module>"#;

const INVALID_MODULE: &str = r#"
<module name="broken" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
  <prefix value="br"/>
</module>"#;

#[test]
fn run_reports_zero_failures_for_a_valid_module() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("acme-system.yin");
    fs::write(&path, VALID_MODULE).unwrap();

    let args = CliArgs::try_parse_from(["yinc", path.to_str().unwrap()]).unwrap();
    let failures = driver::run(&args).unwrap();
    assert_eq!(failures, 0);
}

#[test]
fn run_counts_a_missing_namespace_as_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yin");
    fs::write(&path, INVALID_MODULE).unwrap();

    let args = CliArgs::try_parse_from(["yinc", path.to_str().unwrap()]).unwrap();
    let failures = driver::run(&args).unwrap();
    assert_eq!(failures, 1);
}

#[test]
fn run_bubbles_up_an_unreadable_file_as_an_error() {
    let args = CliArgs::try_parse_from(["yinc", "/nonexistent/does-not-exist.yin"]).unwrap();
    assert!(driver::run(&args).is_err());
}
