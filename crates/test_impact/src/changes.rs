//! Changed-file sources.
//!
//! The change set is either given explicitly or taken from
//! `git diff --name-only --relative <base>` in the workspace root. Both come
//! back relative to the workspace root, even when it is a package nested
//! inside a larger repository.

use crate::error::{ImpactError, ImpactResult};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Revision compared against when no explicit files are given.
pub const DEFAULT_BASE: &str = "origin/main";

/// Where the change set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    /// Paths given on the command line.
    Files(Vec<PathBuf>),
    /// Diff of the working tree against a revision.
    GitDiff { base: String },
}

impl ChangeSource {
    /// Explicit files win; otherwise diff against `base` or `DEFAULT_BASE`.
    ///
    /// Relative `files` are taken as relative to `cwd`, the way a shell user
    /// typed them.
    pub fn from_args(files: Vec<PathBuf>, base: Option<String>, cwd: &Path) -> Self {
        if files.is_empty() {
            ChangeSource::GitDiff {
                base: base.unwrap_or_else(|| DEFAULT_BASE.to_string()),
            }
        } else {
            ChangeSource::Files(anchor_paths(files, cwd))
        }
    }

    /// Resolve the source into a list of paths.
    ///
    /// # Errors
    /// Returns `ImpactError::Git` if git cannot be started or exits non-zero.
    pub async fn changed_files(self, workspace_root: &Path) -> ImpactResult<Vec<PathBuf>> {
        match self {
            ChangeSource::Files(files) => Ok(files),
            ChangeSource::GitDiff { base } => git_diff_names(workspace_root, &base).await,
        }
    }
}

async fn git_diff_names(workspace_root: &Path, base: &str) -> ImpactResult<Vec<PathBuf>> {
    debug!(base, root = %workspace_root.display(), "[affected] git diff");
    let output = Command::new("git")
        .args(["diff", "--name-only", "--relative", base])
        .current_dir(workspace_root)
        .output()
        .await
        .map_err(|e| ImpactError::Git(format!("cannot run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ImpactError::Git(format!(
            "git diff --name-only --relative {base} failed: {}",
            stderr.trim()
        )));
    }

    Ok(parse_name_only(&String::from_utf8_lossy(&output.stdout)))
}

/// Join relative paths onto `base_dir`; absolute paths pass through.
pub fn anchor_paths(files: Vec<PathBuf>, base_dir: &Path) -> Vec<PathBuf> {
    files
        .into_iter()
        .map(|file| {
            if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            }
        })
        .collect()
}

fn parse_name_only(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
