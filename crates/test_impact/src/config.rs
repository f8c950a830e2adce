//! Configuration loading.
//!
//! Settings come from `test-impact.json` in the workspace root when present;
//! every field is optional and falls back to the defaults below.

use crate::affected::discovery::TestFilePattern;
use crate::error::{ImpactError, ImpactResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "test-impact.json";

/// Analysis and runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ImpactConfig {
    /// Globs (relative to the root) enumerating the test universe.
    pub test_globs: Vec<String>,
    /// A graph node is a test file when its name contains one of these.
    pub test_infixes: Vec<String>,
    /// File names whose change selects every test.
    pub invalidation_markers: Vec<String>,
    /// Root of the CLI command implementations.
    pub commands_dir: PathBuf,
    /// Identifier holding the CLI binary path in `execa(cliPath, [...])`.
    pub cli_path_identifier: String,
    /// Helper function name in `callCli([...])`.
    pub call_cli_identifier: String,
    /// Test runner program and leading arguments; test files are appended.
    pub runner: Vec<String>,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            test_globs: vec!["**/*.test.{js,cjs,mjs,ts,cts,mts}".to_string()],
            test_infixes: vec![".test.".to_string()],
            invalidation_markers: [
                "package.json",
                "package-lock.json",
                "npm-shrinkwrap.json",
                "yarn.lock",
                "pnpm-lock.yaml",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            commands_dir: PathBuf::from("src/commands"),
            cli_path_identifier: "cliPath".to_string(),
            call_cli_identifier: "callCli".to_string(),
            runner: vec!["npx".to_string(), "vitest".to_string(), "run".to_string()],
        }
    }
}

impl ImpactConfig {
    /// Load `path`, or `test-impact.json` under `workspace_root` when `path`
    /// is None. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid config JSON.
    pub fn load(workspace_root: &Path, path: Option<&Path>) -> ImpactResult<Self> {
        let (path, required) = match path {
            Some(path) => (workspace_root.join(path), true),
            None => (workspace_root.join(CONFIG_FILE_NAME), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ImpactError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ImpactError::Config { path, source })
    }

    /// Parse config JSON.
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed input or unknown fields.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn test_file_pattern(&self) -> TestFilePattern {
        TestFilePattern::new(self.test_infixes.clone())
    }

    /// Marker matched by the file name of `path`, if any.
    pub fn invalidation_marker(&self, path: &Path) -> Option<&str> {
        let name = path.file_name()?.to_str()?;
        self.invalidation_markers
            .iter()
            .find(|marker| marker.as_str() == name)
            .map(String::as_str)
    }
}
