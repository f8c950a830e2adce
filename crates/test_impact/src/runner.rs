//! External test runner invocation.

use crate::error::{ImpactError, ImpactResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

/// Exit code reported when the runner was killed by a signal.
const SIGNAL_EXIT_CODE: i32 = 1;

/// Run `command` with `test_files` appended, inheriting stdio, and return its
/// exit code.
///
/// # Errors
/// Returns `ImpactError::Spawn` if the command is empty or cannot be started.
pub async fn run_tests<I>(command: &[String], test_files: I, workspace_root: &Path) -> ImpactResult<i32>
where
    I: IntoIterator<Item = String>,
{
    let Some((program, leading_args)) = command.split_first() else {
        return Err(ImpactError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "runner command is empty"),
        });
    };

    let mut cmd = Command::new(program);
    cmd.args(leading_args)
        .args(test_files)
        .current_dir(workspace_root)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    info!(program = %program, "[affected] starting test runner");
    let status = cmd.status().await.map_err(|source| ImpactError::Spawn {
        program: program.clone(),
        source,
    })?;

    Ok(status.code().unwrap_or(SIGNAL_EXIT_CODE))
}
