// tests/config_loading.rs

use std::error::Error;
use std::io::Write;
use std::time::Duration;

use tempfile::{NamedTempFile, TempDir};

use goci::config::{load_and_validate, parse_duration, resolve_config, ConfigFile, DEFAULT_CONFIG_FILE};
use goci::errors::GociError;

type TestResult = Result<(), Box<dyn Error>>;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_parsed() -> TestResult {
    let file = config_file(
        r#"
[push]
remote = "upstream"
branch = "main"
timeout = "2m"
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.remote(), "upstream");
    assert_eq!(cfg.branch(), "main");
    assert_eq!(cfg.push_timeout(), Duration::from_secs(120));
    Ok(())
}

#[test]
fn missing_keys_fall_back_to_defaults() -> TestResult {
    let file = config_file("[push]\nbranch = \"trunk\"\n");

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.remote(), "origin");
    assert_eq!(cfg.branch(), "trunk");
    assert_eq!(cfg.push_timeout(), Duration::from_secs(10));
    Ok(())
}

#[test]
fn empty_file_equals_default_config() -> TestResult {
    let file = config_file("");
    assert_eq!(load_and_validate(file.path())?, ConfigFile::default());
    Ok(())
}

#[test]
fn zero_timeout_is_rejected() {
    let file = config_file("[push]\ntimeout = \"0s\"\n");

    match load_and_validate(file.path()) {
        Err(GociError::ConfigError(msg)) => {
            assert!(msg.contains("[push].timeout"));
            assert!(msg.contains("greater than zero"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn bad_duration_unit_is_rejected() {
    let file = config_file("[push]\ntimeout = \"10 days\"\n");

    match load_and_validate(file.path()) {
        Err(GociError::ConfigError(msg)) => assert!(msg.contains("unsupported duration unit")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn overflowing_timeout_is_rejected() {
    let file = config_file("[push]\ntimeout = \"6000000000000000000h\"\n");

    match load_and_validate(file.path()) {
        Err(GociError::ConfigError(msg)) => {
            assert!(msg.contains("[push].timeout"));
            assert!(msg.contains("too large"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn empty_remote_is_rejected() {
    let file = config_file("[push]\nremote = \"\"\n");

    match load_and_validate(file.path()) {
        Err(GociError::ConfigError(msg)) => assert!(msg.contains("[push].remote")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn unknown_keys_are_toml_errors() {
    let file = config_file("[push]\nforce = true\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(GociError::TomlError(_))
    ));
}

#[test]
fn resolve_prefers_explicit_path() -> TestResult {
    let project = TempDir::new()?;
    std::fs::write(
        project.path().join(DEFAULT_CONFIG_FILE),
        "[push]\nremote = \"project\"\n",
    )?;
    let explicit = config_file("[push]\nremote = \"explicit\"\n");

    let cfg = resolve_config(Some(explicit.path()), project.path())?;
    assert_eq!(cfg.remote(), "explicit");
    Ok(())
}

#[test]
fn resolve_uses_project_file_when_present() -> TestResult {
    let project = TempDir::new()?;
    std::fs::write(
        project.path().join(DEFAULT_CONFIG_FILE),
        "[push]\nremote = \"project\"\n",
    )?;

    let cfg = resolve_config(None, project.path())?;
    assert_eq!(cfg.remote(), "project");
    Ok(())
}

#[test]
fn resolve_without_any_file_uses_defaults() -> TestResult {
    let project = TempDir::new()?;
    assert_eq!(resolve_config(None, project.path())?, ConfigFile::default());
    Ok(())
}

#[test]
fn missing_explicit_path_is_io_error() {
    let project = TempDir::new().unwrap();
    let missing = project.path().join("nope.toml");

    assert!(matches!(
        resolve_config(Some(&missing), project.path()),
        Err(GociError::IoError(_))
    ));
}

#[test]
fn duration_strings() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration(" 3s "), Ok(Duration::from_secs(3)));
    assert_eq!(parse_duration("1m"), Ok(Duration::from_secs(60)));
    assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("s").is_err());
    assert!(parse_duration("307445734561825861m").is_err());
    assert_eq!(
        parse_duration("307445734561825860m"),
        Ok(Duration::from_secs(307445734561825860 * 60))
    );
}
