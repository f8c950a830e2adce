//! File visitor: populates the dependency graph from source files.
//!
//! Starting from an entry file, every relative `require`/`import` and every
//! plugin match is resolved and visited in turn, adding an edge from the
//! importing file. Files already in the graph are linked, never parsed again.

use super::graph::DepGraph;
use super::parser::SourceTree;
use super::plugins::VisitorPlugin;
use super::resolver::ModuleResolver;
use crate::error::{ImpactError, ImpactResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// State of one visiting pass: the graph being built plus the rules used to
/// find edges.
pub struct VisitState {
    graph: DepGraph,
    resolver: ModuleResolver,
    plugins: Vec<Box<dyn VisitorPlugin>>,
    /// Files whose walk has started but not finished (the recursion stack).
    in_progress: HashSet<PathBuf>,
    parsed: Vec<PathBuf>,
}

impl VisitState {
    pub fn new(resolver: ModuleResolver, plugins: Vec<Box<dyn VisitorPlugin>>) -> Self {
        Self {
            graph: DepGraph::new(),
            resolver,
            plugins,
            in_progress: HashSet::new(),
            parsed: Vec::new(),
        }
    }

    pub fn graph(&self) -> &DepGraph {
        &self.graph
    }

    pub fn into_graph(self) -> DepGraph {
        self.graph
    }

    /// Files parsed so far, in parse order.
    pub fn parsed_files(&self) -> &[PathBuf] {
        &self.parsed
    }
}

/// Visit `path` (a workspace-relative identifier) and everything it depends on.
///
/// # Errors
/// Returns an error if `path` or any file reached from it cannot be read or
/// parsed. Specifiers that do not resolve are skipped.
pub fn visit(path: &Path, state: &mut VisitState, parent: Option<&Path>) -> ImpactResult<()> {
    if state.graph.has_file(path) || state.in_progress.contains(path) {
        if let Some(parent) = parent {
            state.graph.add_dependency(parent, path);
        }
        return Ok(());
    }

    state.in_progress.insert(path.to_path_buf());
    let dependencies = collect_dependencies(path, state)?;
    state.parsed.push(path.to_path_buf());

    for dependency in &dependencies {
        visit(dependency, state, Some(path))?;
    }
    state.in_progress.remove(path);

    state.graph.add_file(path);
    if let Some(parent) = parent {
        state.graph.add_dependency(parent, path);
    }
    Ok(())
}

/// Visit every entry file into the same graph.
///
/// # Errors
/// Stops at the first file that cannot be read or parsed.
pub fn visit_all<P: AsRef<Path>>(entries: &[P], state: &mut VisitState) -> ImpactResult<()> {
    for entry in entries {
        visit(entry.as_ref(), state, None)?;
    }
    Ok(())
}

fn collect_dependencies(path: &Path, state: &VisitState) -> ImpactResult<Vec<PathBuf>> {
    let absolute = state.resolver.workspace_root().join(path);
    let bytes = std::fs::read(&absolute).map_err(|source| ImpactError::Read {
        path: absolute.clone(),
        source,
    })?;
    // Binary fixtures and legacy encodings still yield a walkable tree.
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let tree = SourceTree::parse(path, content)?;
    if tree.has_syntax_errors() {
        warn!(file = %path.display(), "[affected] syntax errors, using recovered tree");
    }

    let mut dependencies = Vec::new();
    tree.walk(|node| {
        if let Some(specifier) = node.require_specifier().or_else(|| node.import_specifier()) {
            if let Some(resolved) = state.resolver.resolve(path, specifier) {
                dependencies.push(resolved);
            }
        }
        for plugin in &state.plugins {
            if let Some(file) = plugin.try_resolve(node) {
                debug!(
                    file = %path.display(),
                    plugin = plugin.id(),
                    dependency = %file.display(),
                    "[affected] plugin edge"
                );
                dependencies.push(file);
            }
        }
    });

    debug!(file = %path.display(), count = dependencies.len(), "[affected] parsed");
    Ok(dependencies)
}
