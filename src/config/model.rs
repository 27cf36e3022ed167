// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::FabdeckError;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [project]
/// name = "fabric"
///
/// [fabric]
/// path = "/var/lib/rundeck/projects/fabric/fabric"
/// virtualenv = "/var/lib/rundeck/projects/fabric/fabricenv"
///
/// [discovery]
/// mode = "script"
/// timeout_secs = 60
///
/// [rundeck]
/// url = "http://localhost:4440"
/// api_token_env = "RUNDECK_TOKEN"
/// ```
///
/// `[rundeck]` may be omitted for `--dry-run` invocations.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub fabric: FabricSection,
    #[serde(default)]
    pub discovery: DiscoverySection,
    #[serde(default)]
    pub rundeck: Option<RundeckSection>,
}

/// `[project]` section: the target project on the job server.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    pub name: String,
}

/// `[fabric]` section: where the task-automation source tree and its
/// interpreter environment live.
#[derive(Debug, Clone, Deserialize)]
pub struct FabricSection {
    /// Checked-out source tree containing the task-automation file.
    pub path: PathBuf,
    /// Virtualenv root with the task-automation library installed.
    pub virtualenv: PathBuf,
}

impl FabricSection {
    /// Interpreter binary inside the virtualenv.
    pub fn python_bin(&self) -> PathBuf {
        self.virtualenv.join("bin").join("python")
    }

    /// Task runner binary inside the virtualenv.
    pub fn fab_bin(&self) -> PathBuf {
        self.virtualenv.join("bin").join("fab")
    }
}

/// `[discovery]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverySection {
    /// How the discovery process is invoked; both modes share the same
    /// stdout contract.
    #[serde(default)]
    pub mode: DiscoveryMode,

    /// Companion command line for `mode = "helper"`; run through the shell
    /// with the fabric path as working directory.
    #[serde(default)]
    pub helper: Option<String>,

    /// Wall-clock budget for the discovery process.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            mode: DiscoveryMode::default(),
            helper: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Pipe the inline introspection script into the interpreter's stdin.
    #[default]
    Script,
    /// Invoke a long-running companion's argument-based entry point.
    Helper,
}

/// `[rundeck]` section: the job server to register against.
#[derive(Debug, Clone, Deserialize)]
pub struct RundeckSection {
    pub url: String,

    /// API token, inline. Prefer `api_token_env` to keep tokens out of
    /// config files.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Name of an environment variable holding the API token.
    #[serde(default)]
    pub api_token_env: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: u32,
}

fn default_api_version() -> u32 {
    41
}

impl RundeckSection {
    /// Resolve the API token from the inline value or the named
    /// environment variable.
    pub fn resolve_token(&self) -> Result<String, FabdeckError> {
        if let Some(token) = &self.api_token {
            return Ok(token.clone());
        }
        if let Some(var) = &self.api_token_env {
            return std::env::var(var).map_err(|_| {
                FabdeckError::Other(anyhow::anyhow!(
                    "environment variable '{var}' from [rundeck].api_token_env is not set"
                ))
            });
        }
        Err(FabdeckError::Other(anyhow::anyhow!(
            "[rundeck] needs api_token or api_token_env"
        )))
    }
}
