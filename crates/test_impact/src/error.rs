//! Error type shared by graph construction and test selection.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an impact analysis run.
#[derive(Debug, Error)]
pub enum ImpactError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("test file walk failed: {0}")]
    Walk(#[source] ignore::Error),
    #[error("invalid test glob: {0}")]
    Glob(#[source] ignore::Error),
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot serialize selection: {0}")]
    Output(#[from] serde_json::Error),
    #[error("git: {0}")]
    Git(String),
    #[error("cannot start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ImpactResult<T> = Result<T, ImpactError>;
