// src/config/validate.rs

use anyhow::{Result, anyhow};

use crate::config::model::{ConfigFile, DiscoveryMode};

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `[project].name` is non-empty
/// - `[fabric].path` / `[fabric].virtualenv` are non-empty
/// - `mode = "helper"` comes with a `helper` command
/// - `timeout_secs >= 1`
/// - `[rundeck]`, when present, has a URL and at most one token source
///
/// Token *presence* is only enforced when a registration run actually needs
/// it, so `--dry-run` works without credentials.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    if cfg.project.name.trim().is_empty() {
        return Err(anyhow!("[project].name must not be empty"));
    }
    if cfg.fabric.path.as_os_str().is_empty() {
        return Err(anyhow!("[fabric].path must not be empty"));
    }
    if cfg.fabric.virtualenv.as_os_str().is_empty() {
        return Err(anyhow!("[fabric].virtualenv must not be empty"));
    }

    validate_discovery(cfg)?;
    validate_rundeck(cfg)?;
    Ok(())
}

fn validate_discovery(cfg: &ConfigFile) -> Result<()> {
    if cfg.discovery.timeout_secs == 0 {
        return Err(anyhow!("[discovery].timeout_secs must be >= 1 (got 0)"));
    }
    match cfg.discovery.mode {
        DiscoveryMode::Helper => {
            let has_helper = cfg
                .discovery
                .helper
                .as_deref()
                .is_some_and(|h| !h.trim().is_empty());
            if !has_helper {
                return Err(anyhow!(
                    "[discovery].mode = \"helper\" requires [discovery].helper"
                ));
            }
        }
        DiscoveryMode::Script => {}
    }
    Ok(())
}

fn validate_rundeck(cfg: &ConfigFile) -> Result<()> {
    let Some(rundeck) = &cfg.rundeck else {
        return Ok(());
    };
    if rundeck.url.trim().is_empty() {
        return Err(anyhow!("[rundeck].url must not be empty"));
    }
    if rundeck.api_token.is_some() && rundeck.api_token_env.is_some() {
        return Err(anyhow!(
            "[rundeck] must set at most one of api_token and api_token_env"
        ));
    }
    Ok(())
}
