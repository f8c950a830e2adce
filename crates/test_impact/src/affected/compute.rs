//! Affected file computation using reverse BFS.
//!
//! Computes the transitive closure of files that depend on a change set.

use super::graph::DepGraph;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Compute all files affected by the changed set.
///
/// Returns the changed files plus all files that transitively depend on them,
/// restricted to nodes accepted by `filter`. Changed files unknown to the
/// graph are ignored. Every node is expanded at most once, so cycles terminate.
pub fn compute_affected<P: AsRef<Path>>(
    changed: &[P],
    graph: &DepGraph,
    filter: Option<&dyn Fn(&Path) -> bool>,
) -> HashSet<PathBuf> {
    let mut visited = HashSet::new();
    let mut affected = HashSet::new();
    let mut queue = VecDeque::new();

    for path in changed {
        let path = path.as_ref();
        if graph.has_file(path) && visited.insert(path.to_path_buf()) {
            queue.push_back(path.to_path_buf());
        }
    }

    // BFS over incoming edges
    while let Some(current) = queue.pop_front() {
        for dependent in graph.dependents(&current) {
            if visited.insert(dependent.clone()) {
                queue.push_back(dependent);
            }
        }

        let accepted = match filter {
            Some(accept) => accept(&current),
            None => true,
        };
        if accepted {
            affected.insert(current);
        }
    }

    affected
}
