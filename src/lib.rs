// src/lib.rs

pub mod cli;
pub mod compile;
pub mod config;
pub mod discover;
pub mod errors;
pub mod logging;
pub mod register;
pub mod schedule;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::compile::{CompileContext, JobDocument};
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::discover::TaskDescriptor;
use crate::errors::FabdeckError;
use crate::register::{Registrar, RundeckClient};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub compiled: usize,
    pub skipped: usize,
    pub registered: usize,
    pub failed: usize,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together the sequential pipeline:
/// - config loading
/// - task discovery (external process)
/// - introspection into task descriptors
/// - job document compilation (per-task failures skip, never abort)
/// - registration against the job server (or dry-run printing)
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let cfg = load_and_validate(&args.config)?;

    let timeout_secs = args.timeout_secs.unwrap_or(cfg.discovery.timeout_secs);
    let payload = discover::run_discovery(&cfg, timeout_secs)
        .await
        .context("task discovery failed")?;

    let descriptors = discover::introspect(&payload);
    let mut summary = RunSummary {
        discovered: descriptors.len(),
        ..RunSummary::default()
    };

    let documents = compile_all(&cfg, descriptors, &mut summary);
    summary.compiled = documents.len();

    if args.dry_run {
        print_dry_run(&cfg, &documents)?;
        print_summary(&summary);
        return Ok(summary);
    }

    let rundeck = cfg
        .rundeck
        .as_ref()
        .ok_or_else(|| anyhow!("[rundeck] section is required unless --dry-run is given"))?;
    let client = RundeckClient::from_config(rundeck)?;

    let registrar = Registrar::new(&client, &cfg.project.name);
    let report = registrar.register_all(&documents).await;
    summary.registered = report.registered;
    summary.failed = report.failed;

    info!(
        discovered = summary.discovered,
        compiled = summary.compiled,
        skipped = summary.skipped,
        registered = summary.registered,
        failed = summary.failed,
        "run complete"
    );
    print_summary(&summary);
    Ok(summary)
}

/// Compile every introspected descriptor, skipping per-task failures.
fn compile_all(
    cfg: &ConfigFile,
    descriptors: Vec<std::result::Result<TaskDescriptor, FabdeckError>>,
    summary: &mut RunSummary,
) -> Vec<JobDocument> {
    let ctx = CompileContext::new(cfg.fabric.path.clone(), cfg.fabric.fab_bin());
    let mut documents = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let descriptor = match descriptor {
            Ok(d) => d,
            Err(err) => {
                warn!(error = %err, "skipping uninspectable task");
                summary.skipped += 1;
                continue;
            }
        };
        match ctx.compile(&descriptor) {
            Ok(document) => documents.push(document),
            Err(err) => {
                warn!(task = %descriptor.dotted_name(), error = %err, "skipping task");
                summary.skipped += 1;
            }
        }
    }

    documents
}

/// Dry-run output: the YAML documents that would be submitted.
fn print_dry_run(cfg: &ConfigFile, documents: &[JobDocument]) -> Result<()> {
    println!("fabdeck dry-run");
    println!("  project = {}", cfg.project.name);
    println!("  jobs = {}", documents.len());
    println!();

    for document in documents {
        println!("{}", document.to_yaml()?);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "discovered {} / compiled {} / skipped {} / registered {} / failed {}",
        summary.discovered,
        summary.compiled,
        summary.skipped,
        summary.registered,
        summary.failed
    );
}
