// tests/step_execution.rs

mod common;
use crate::common::{init_tracing, Behaviour, FakeLauncher};

use std::error::Error;
use std::time::Duration;

use goci::errors::{DeadlineExceeded, ExitCode, StepCause, StepErrorKind};
use goci::pipeline::{Step, StepKind, DEFAULT_STEP_TIMEOUT};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn plain_step_returns_success_message() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();
    let step = Step::new("go build", "go", &["build", "."], "/proj", "Go Build: SUCCESS");

    let msg = step.execute(&launcher).await?;

    assert_eq!(msg, "Go Build: SUCCESS");
    let launched = launcher.launched();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].program, "go");
    assert_eq!(launched[0].args, vec!["build".to_string(), ".".to_string()]);
    assert_eq!(launched[0].dir, std::path::PathBuf::from("/proj"));
    assert!(!launched[0].capture_stdout);
    Ok(())
}

#[tokio::test]
async fn plain_step_non_zero_exit_is_execution_error() {
    init_tracing();
    let launcher = FakeLauncher::new().on("go", Behaviour::Fail(2));
    let step = Step::new("go build", "go", &[], ".", "Go Build: SUCCESS");

    let err = step.execute(&launcher).await.unwrap_err();

    assert_eq!(err.kind(), StepErrorKind::Execution);
    assert!(err.is_step("go build"));
    assert_eq!(err.message(), "failed to execute");
    assert!(matches!(err.cause(), Some(StepCause::Exit(ExitCode(Some(2))))));
    assert!(!err.is_timeout());
    assert_eq!(
        err.to_string(),
        "Step: \"go build\": failed to execute: Cause: exit status 2"
    );
}

#[tokio::test]
async fn spawn_failure_is_execution_error_with_io_cause() {
    init_tracing();
    let launcher = FakeLauncher::new().on("missing", Behaviour::SpawnError);
    let step = Step::new("missing tool", "missing", &[], ".", "never");

    let err = step.execute(&launcher).await.unwrap_err();

    assert_eq!(err.kind(), StepErrorKind::Execution);
    match err.cause() {
        Some(StepCause::Launch(io)) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected launch cause, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_step_ignores_stdout() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new().on("go", Behaviour::Print("noise\n".into()));
    let step = Step::new("go test", "go", &[], ".", "Go Test: SUCCESS");

    assert_eq!(step.execute(&launcher).await?, "Go Test: SUCCESS");
    Ok(())
}

#[tokio::test]
async fn output_validating_step_succeeds_when_silent() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();
    let step = Step::output_validating("go fmt", "gofmt", &["-l", "."], ".", "Gofmt: SUCCESS");

    assert_eq!(step.execute(&launcher).await?, "Gofmt: SUCCESS");
    assert!(launcher.launched()[0].capture_stdout);
    Ok(())
}

#[tokio::test]
async fn output_validating_step_fails_on_stdout() {
    init_tracing();
    let launcher = FakeLauncher::new().on("gofmt", Behaviour::Print("file.go\n".into()));
    let step = Step::output_validating("go fmt", "gofmt", &["-l", "."], ".", "Gofmt: SUCCESS");

    let err = step.execute(&launcher).await.unwrap_err();

    assert_eq!(err.kind(), StepErrorKind::FormatViolation);
    assert!(err.is_step("go fmt"));
    assert_eq!(err.message(), "invalid format: file.go\n");
    assert!(err.cause().is_none());
    assert!(err.source().is_none());
}

#[tokio::test]
async fn output_validating_step_reports_exit_failure_first() {
    init_tracing();
    let launcher = FakeLauncher::new().on("gofmt", Behaviour::Fail(1));
    let step = Step::output_validating("go fmt", "gofmt", &[], ".", "Gofmt: SUCCESS");

    let err = step.execute(&launcher).await.unwrap_err();
    assert_eq!(err.kind(), StepErrorKind::Execution);
}

#[tokio::test]
async fn timeout_step_reports_deadline_exceeded() {
    init_tracing();
    let launcher = FakeLauncher::new().on("git", Behaviour::Hang);
    let step = Step::with_timeout(
        "git push",
        "git",
        &["push"],
        ".",
        "Git Push: SUCCESS",
        Some(Duration::from_millis(50)),
    );

    let err = step.execute(&launcher).await.unwrap_err();

    assert_eq!(err.kind(), StepErrorKind::Timeout);
    assert!(err.is_step("git push"));
    assert_eq!(err.message(), "failed time out");
    assert!(err.is_timeout());

    // The marker is reachable through the standard source chain too.
    let source = err.source().expect("timeout error has a cause");
    let marker = source.source().and_then(|s| s.downcast_ref::<DeadlineExceeded>());
    assert_eq!(marker, Some(&DeadlineExceeded));

    // The simulated process was dropped, not run to completion.
    assert!(launcher.finished_programs().is_empty());
}

#[tokio::test]
async fn timeout_step_failing_before_deadline_is_execution_error() {
    init_tracing();
    let launcher = FakeLauncher::new().on("git", Behaviour::Fail(128));
    let step = Step::with_timeout("git push", "git", &[], ".", "ok", Some(Duration::from_secs(5)));

    let err = step.execute(&launcher).await.unwrap_err();

    assert_eq!(err.kind(), StepErrorKind::Execution);
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn timeout_step_completing_in_time_succeeds() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new().on(
        "git",
        Behaviour::Delay(Duration::from_millis(10), Box::new(Behaviour::Succeed)),
    );
    let step = Step::with_timeout(
        "git push",
        "git",
        &[],
        ".",
        "Git Push: SUCCESS",
        Some(Duration::from_secs(5)),
    );

    assert_eq!(step.execute(&launcher).await?, "Git Push: SUCCESS");
    Ok(())
}

#[test]
fn timeout_defaults_to_thirty_seconds() {
    let unset = Step::with_timeout("s", "p", &[], ".", "m", None);
    let zero = Step::with_timeout("s", "p", &[], ".", "m", Some(Duration::ZERO));
    let set = Step::with_timeout("s", "p", &[], ".", "m", Some(Duration::from_secs(10)));

    assert_eq!(DEFAULT_STEP_TIMEOUT, Duration::from_secs(30));
    assert_eq!(unset.timeout(), Some(DEFAULT_STEP_TIMEOUT));
    assert_eq!(zero.timeout(), Some(DEFAULT_STEP_TIMEOUT));
    assert_eq!(set.kind(), StepKind::Timeout(Duration::from_secs(10)));
    assert_eq!(Step::new("s", "p", &[], ".", "m").timeout(), None);
}

#[test]
fn step_errors_compare_by_step_identifier() {
    use goci::errors::StepError;

    let a = StepError::execution("go build", StepCause::Exit(ExitCode(Some(1))));
    let b = StepError::format_violation("go build", "x.go");
    let c = StepError::timed_out("git push");

    assert!(a.same_step(&b));
    assert!(!a.same_step(&c));
    assert_eq!(
        c.to_string(),
        "Step: \"git push\": failed time out: Cause: deadline exceeded"
    );
    assert_eq!(b.to_string(), "Step: \"go build\": invalid format: x.go");
}
