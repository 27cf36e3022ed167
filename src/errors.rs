// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! The split matters for the pipeline: errors local to a single task
//! (`InvalidSchedule`, `UninspectableTask`, `Registration`) are logged and
//! that task is skipped, while discovery errors are fatal for the whole run
//! since no tasks can be known without a payload.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FabdeckError {
    #[error("invalid cron schedule '{0}'")]
    InvalidSchedule(String),

    #[error("cannot introspect task '{task}': {reason}")]
    UninspectableTask { task: String, reason: String },

    #[error("discovery process failed (exit {status}): {stderr}")]
    DiscoveryProcess { status: i32, stderr: String },

    #[error("discovery process timed out after {0}s")]
    DiscoveryTimeout(u64),

    #[error("registering job '{job}' failed: {reason}")]
    Registration { job: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
