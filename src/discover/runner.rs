// src/discover/runner.rs

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::model::{ConfigFile, DiscoveryMode};
use crate::discover::payload::DiscoveryPayload;
use crate::errors::FabdeckError;

/// Introspection procedure piped to the interpreter's stdin in script mode.
///
/// It loads the task-automation file from the working directory and dumps
/// the raw namespace snapshot as JSON on stdout: nested mappings for
/// namespaces, callable records (decorator metadata included) for tasks.
/// Resolution of wrapper chains happens on our side, in
/// [`crate::discover::introspect`].
pub const INTROSPECT_SCRIPT: &str = r##"
import inspect
import json
import sys

from fabric.main import find_fabfile, load_fabfile

MAX_DEPTH = 8


def dump_callable(obj, depth=0):
    info = {
        'code_name': '',
        'name': getattr(obj, '__name__', None),
        'doc': obj.__doc__,
    }
    schedule = getattr(obj, 'schedule', None)
    if schedule is not None:
        info['schedule'] = schedule
    try:
        spec = inspect.getfullargspec(obj)
        info['argspec'] = {
            'args': list(spec.args),
            'varargs': spec.varargs,
            'keywords': spec.varkw,
            'defaults': list(spec.defaults) if spec.defaults else None,
        }
    except TypeError:
        pass
    code = getattr(obj, '__code__', None)
    if code is not None:
        info['code_name'] = code.co_name
        if depth < MAX_DEPTH and code.co_freevars:
            cells = getattr(obj, '__closure__', None) or ()
            closure = {}
            for var, cell in zip(code.co_freevars, cells):
                try:
                    value = cell.cell_contents
                except ValueError:
                    continue
                if callable(value):
                    closure[var] = dump_callable(value, depth + 1)
            if closure:
                info['closure'] = closure
    wrapped = getattr(obj, 'wrapped', None)
    if depth < MAX_DEPTH and wrapped is not None:
        info['wrapped'] = dump_callable(wrapped, depth + 1)
    return info


def dump_namespace(mapping, depth=0):
    out = {}
    for key, value in mapping.items():
        if isinstance(value, dict) and depth < MAX_DEPTH:
            out[key] = dump_namespace(value, depth + 1)
        else:
            out[key] = dump_callable(value)
    return out


callables = load_fabfile(find_fabfile())[1]
json.dump(dump_namespace(callables), sys.stdout, default=str)
"##;

/// Run discovery as configured and parse the payload.
///
/// Script mode pipes [`INTROSPECT_SCRIPT`] into the environment's
/// interpreter; helper mode runs a companion command through the shell.
/// Both share the same stdout contract.
pub async fn run_discovery(
    cfg: &ConfigFile,
    timeout_secs: u64,
) -> Result<DiscoveryPayload, FabdeckError> {
    match cfg.discovery.mode {
        DiscoveryMode::Script => {
            let python = cfg.fabric.python_bin();
            info!(interpreter = %python.display(), "running inline discovery script");
            let mut cmd = Command::new(&python);
            cmd.arg("-").current_dir(&cfg.fabric.path);
            run_command(cmd, Some(INTROSPECT_SCRIPT), timeout_secs).await
        }
        DiscoveryMode::Helper => {
            // Validation guarantees the helper is set in this mode.
            let helper = cfg.discovery.helper.clone().unwrap_or_default();
            info!(helper = %helper, "running discovery helper");
            let cmd = shell_command(&helper, &cfg.fabric.path);
            run_command(cmd, None, timeout_secs).await
        }
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(command_line: &str, cwd: &Path) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_line);
        c
    };
    cmd.current_dir(cwd);
    cmd
}

/// Spawn a prepared discovery command, enforce the timeout, and parse its
/// stdout as a discovery payload.
///
/// Non-zero exit and unparseable output both surface as
/// `DiscoveryProcess`, carrying captured stderr for operator visibility;
/// an expired timeout kills the child and surfaces as `DiscoveryTimeout`.
pub async fn run_command(
    mut cmd: Command,
    stdin_payload: Option<&str>,
    timeout_secs: u64,
) -> Result<DiscoveryPayload, FabdeckError> {
    cmd.stdin(if stdin_payload.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

    let mut child = cmd.spawn()?;

    if let Some(payload) = stdin_payload {
        // Taking stdin closes the pipe once the write finishes, letting the
        // interpreter see EOF on its script input.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(payload.as_bytes()).await?;
        }
    }

    let output = tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        child.wait_with_output(),
    )
    .await
    .map_err(|_| FabdeckError::DiscoveryTimeout(timeout_secs))??;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(FabdeckError::DiscoveryProcess {
            status: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    debug!(bytes = output.stdout.len(), "discovery payload captured");
    serde_json::from_slice(&output.stdout).map_err(|err| FabdeckError::DiscoveryProcess {
        status: 0,
        stderr: format!("unparseable discovery payload: {err}; stderr: {stderr}"),
    })
}
