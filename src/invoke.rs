//! Linter Invocation
//!
//! Spawns the external tool for one document, captures its output, and
//! classifies the exit. Exit code 1 is the tool's "issues found" signal,
//! so 0 and 1 both count as a usable run.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::Config;

/// Exit codes that are normal signals rather than failures.
const TOLERATED_EXIT_CODES: [i32; 2] = [0, 1];

/// Why an invocation produced no usable output.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("linter executable `{command}` not found: {source}")]
    Spawn {
        command: String,
        #[source]
        source: which::Error,
    },
    #[error("linter exited with code {code}: {stderr}")]
    FatalExit { code: i32, stderr: String },
    #[error("linter terminated by signal")]
    Signalled,
    #[error("linter did not finish within {0:?}")]
    Timeout(Duration),
    #[error("linter i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw output of one tool invocation, discarded after parsing.
#[derive(Debug, Clone)]
pub struct RawToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Run the configured linter against `target`.
///
/// No state is retained between invocations.
pub async fn invoke(config: &Config, target: &Path) -> Result<RawToolOutput, InvokeError> {
    let resolved = which::which(&config.linter_command).map_err(|source| InvokeError::Spawn {
        command: config.linter_command.clone(),
        source,
    })?;

    let cwd = resolve_working_dir(target, &config.root_markers);

    let mut cmd = Command::new(&resolved);
    cmd.args(&config.linter_args)
        .arg(target)
        .current_dir(&cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    log::debug!(
        "running {} {:?} {} (cwd {})",
        resolved.display(),
        config.linter_args,
        target.display(),
        cwd.display()
    );

    let output = match config.linter_timeout {
        // kill_on_drop reaps the child when the timeout wins the race.
        Some(limit) => tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| InvokeError::Timeout(limit))??,
        None => cmd.output().await?,
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    match output.status.code() {
        Some(code) if TOLERATED_EXIT_CODES.contains(&code) => Ok(RawToolOutput {
            stdout,
            stderr,
            exit_code: Some(code),
        }),
        Some(code) => Err(InvokeError::FatalExit { code, stderr }),
        None => Err(InvokeError::Signalled),
    }
}

/// Nearest ancestor of `target` containing one of the root markers, falling
/// back to the directory containing the file. Some tools expect to run from
/// the project root to find their own configuration.
pub fn resolve_working_dir(target: &Path, root_markers: &[String]) -> PathBuf {
    let file_dir = target
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    if root_markers.is_empty() {
        return file_dir;
    }

    for dir in target.ancestors().skip(1) {
        if root_markers.iter().any(|marker| dir.join(marker).exists()) {
            return dir.to_path_buf();
        }
    }

    file_dir
}
