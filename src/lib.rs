// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{resolve_config, ConfigFile};
use crate::errors::{GociError, Result};
use crate::exec::{ProcessLauncher, RealProcessLauncher};
use crate::pipeline::{canonical_pipeline, Pipeline, Runner, StepKind};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project directory validation
/// - config resolution
/// - the canonical pipeline
/// - the runner (with SIGINT / SIGTERM handling)
pub async fn run(args: CliArgs) -> Result<()> {
    let project = validate_project(&args.project)?;
    let cfg = resolve_config(args.config.as_deref(), project)?;

    let mut stdout = std::io::stdout();

    if args.dry_run {
        let pipeline = canonical_pipeline(project, &cfg);
        print_dry_run(&pipeline, &mut stdout)?;
        return Ok(());
    }

    run_pipeline(project, &cfg, Arc::new(RealProcessLauncher), &mut stdout).await
}

/// Run the canonical pipeline for `project`, writing success messages to
/// `out`.
///
/// An empty project directory fails validation before any process is
/// launched.
pub async fn run_project<W: Write>(
    project: &str,
    cfg: &ConfigFile,
    launcher: Arc<dyn ProcessLauncher>,
    out: &mut W,
) -> Result<()> {
    let project = validate_project(project)?;
    run_pipeline(project, cfg, launcher, out).await
}

/// Run the canonical pipeline for an already validated project directory.
async fn run_pipeline<W: Write>(
    project: &Path,
    cfg: &ConfigFile,
    launcher: Arc<dyn ProcessLauncher>,
    out: &mut W,
) -> Result<()> {
    let pipeline = canonical_pipeline(project, cfg);
    info!(project = %project.display(), steps = pipeline.len(), "running pipeline");

    Runner::with_launcher(pipeline, launcher).run(out).await
}

fn validate_project(project: &str) -> Result<&Path> {
    if project.trim().is_empty() {
        return Err(GociError::Validation(
            "project directory is required".to_string(),
        ));
    }
    Ok(Path::new(project))
}

/// Simple dry-run output: print steps, commands and timeouts.
pub fn print_dry_run<W: Write>(pipeline: &Pipeline, out: &mut W) -> Result<()> {
    writeln!(out, "goci dry-run")?;
    writeln!(out, "steps ({}):", pipeline.len())?;

    for step in pipeline.steps() {
        writeln!(out, "  - {}", step.name())?;
        writeln!(out, "      cmd: {} {}", step.program(), step.args().join(" "))?;
        writeln!(out, "      dir: {}", step.dir().display())?;
        match step.kind() {
            StepKind::Plain => {}
            StepKind::OutputValidating => writeln!(out, "      fails on stdout output: true")?,
            StepKind::Timeout(t) => writeln!(out, "      timeout: {t:?}")?,
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
