use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio::process::Command;

/// Captured output of a finished external command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{program} timed out after {deadline:?}")]
    Timeout {
        program: String,
        deadline: Duration,
    },
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with status {code}: {stderr}")]
    NonZeroExit {
        program: String,
        code: i32,
        stderr: String,
    },
    #[error("i/o error while running {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

/// Run one external command to completion and capture its output.
///
/// Arguments are passed as an explicit vector, never through a shell. The
/// deadline is enforced with `tokio::time::timeout`; `kill_on_drop` ensures
/// the child is terminated when the wait future is dropped on expiry, so a
/// timed-out process does not linger.
pub async fn execute(
    dir: &Path,
    program: &str,
    args: &[&str],
    deadline: Duration,
) -> Result<CommandOutput, ExecError> {
    debug!("exec: {program} {args:?} in {dir:?}");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let output = match tokio::time::timeout(deadline, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => {
            return Err(ExecError::Io {
                program: program.to_string(),
                source,
            });
        }
        Err(_) => {
            debug!("exec timed out: {program} {args:?}");
            return Err(ExecError::Timeout {
                program: program.to_string(),
                deadline,
            });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(ExecError::NonZeroExit {
            program: program.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(CommandOutput { stdout, stderr })
}
