//! Affected test selection.
//!
//! Turns a change set into the list of tests to run: either every test (a
//! global invalidation marker changed) or the tests that transitively depend
//! on a changed file, computed from a freshly built dependency graph.

use super::discovery::discover_test_files;
use super::graph::DepGraph;
use super::plugins::cli_plugins;
use super::resolver::ModuleResolver;
use super::visitor::{visit_all, VisitState};
use crate::config::ImpactConfig;
use crate::error::ImpactResult;
use crate::normalize::path::{display_identifier, to_identifier};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// How the test list was derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum SelectionMode {
    /// A global invalidation marker changed, every test is selected.
    #[serde(rename_all = "camelCase")]
    FullRun { marker: String, trigger: PathBuf },
    /// Tests were selected from the dependency graph.
    Selective,
}

/// Result of affected test selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub test_files: Vec<PathBuf>,
    pub changed_files: Vec<PathBuf>,
    pub mode: SelectionMode,
}

impl Selection {
    pub fn is_full_run(&self) -> bool {
        matches!(self.mode, SelectionMode::FullRun { .. })
    }

    /// Test files rendered as runner arguments.
    pub fn test_args(&self) -> impl Iterator<Item = String> + '_ {
        self.test_files.iter().map(|path| display_identifier(path))
    }
}

/// Select the tests affected by `changed`.
///
/// # Errors
/// Returns an error if test discovery fails or any test file (or a file it
/// depends on) cannot be read or parsed. There is no partial result.
pub fn select_tests<P: AsRef<Path>>(
    workspace_root: &Path,
    config: &ImpactConfig,
    changed: &[P],
) -> ImpactResult<Selection> {
    let changed_files: Vec<PathBuf> = changed
        .iter()
        .map(|path| to_identifier(path.as_ref(), workspace_root))
        .collect();
    log_changed_files(&changed_files);

    let test_files = discover_test_files(workspace_root, &config.test_globs)?;

    if let Some((trigger, marker)) = find_invalidation_marker(config, &changed_files) {
        info!(
            marker,
            trigger = %trigger.display(),
            tests = test_files.len(),
            "[affected] full run: {} changed, all tests are affected",
            trigger.display()
        );
        let mode = SelectionMode::FullRun {
            marker: marker.to_string(),
            trigger: trigger.to_path_buf(),
        };
        return Ok(Selection {
            test_files,
            changed_files,
            mode,
        });
    }

    let graph = build_graph(workspace_root, config, &test_files)?;
    let pattern = config.test_file_pattern();
    let is_test_file = |path: &Path| pattern.is_test_file(path);

    let mut selected: Vec<PathBuf> = graph
        .affected(&changed_files, Some(&is_test_file))
        .into_iter()
        .collect();
    selected.sort();

    info!(
        changed = changed_files.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        tests = selected.len(),
        universe = test_files.len(),
        "[affected] selective run"
    );

    Ok(Selection {
        test_files: selected,
        changed_files,
        mode: SelectionMode::Selective,
    })
}

/// Build the dependency graph reachable from `test_files`.
///
/// # Errors
/// Fails on the first file that cannot be read or parsed.
pub fn build_graph(
    workspace_root: &Path,
    config: &ImpactConfig,
    test_files: &[PathBuf],
) -> ImpactResult<DepGraph> {
    let resolver = ModuleResolver::new(workspace_root.to_path_buf());
    let plugins = cli_plugins(
        &resolver,
        &config.commands_dir,
        &config.call_cli_identifier,
        &config.cli_path_identifier,
    );
    let mut state = VisitState::new(resolver, plugins);
    visit_all(test_files, &mut state)?;
    Ok(state.into_graph())
}

/// First changed file whose name is a global invalidation marker.
fn find_invalidation_marker<'a>(
    config: &'a ImpactConfig,
    changed: &'a [PathBuf],
) -> Option<(&'a Path, &'a str)> {
    changed
        .iter()
        .find_map(|path| config.invalidation_marker(path).map(|marker| (path.as_path(), marker)))
}

fn log_changed_files(changed: &[PathBuf]) {
    if changed.is_empty() {
        info!("[affected] no changed files");
        return;
    }
    let list: Vec<String> = changed.iter().map(|path| display_identifier(path)).collect();
    info!(count = changed.len(), files = %list.join(", "), "[affected] changed files");
}
