//! Dependency graph using petgraph.
//!
//! Stores file dependencies as a directed graph where edge A→B means "A imports B".
//! Nodes are workspace-relative file identifiers (see `normalize::path`).

use super::compute::compute_affected;
use petgraph::dot::{Config, Dot};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Dependency graph storing file import relationships.
///
/// Built fresh for every analysis run and only grows: nodes and edges are
/// never removed.
#[derive(Debug)]
pub struct DepGraph {
    graph: StableDiGraph<PathBuf, ()>,
    path_to_idx: HashMap<PathBuf, NodeIndex>,
}

impl Default for DepGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DepGraph {
    /// Create a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            path_to_idx: HashMap::new(),
        }
    }

    /// Check if graph contains a file.
    pub fn has_file(&self, path: &Path) -> bool {
        self.path_to_idx.contains_key(path)
    }

    /// Add a file to the graph. Returns the node index.
    /// Adding a known file returns its existing index.
    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(&idx) = self.path_to_idx.get(path) {
            return idx;
        }

        let idx = self.graph.add_node(path.to_path_buf());
        self.path_to_idx.insert(path.to_path_buf(), idx);
        idx
    }

    /// Record that `parent` depends on `child`, creating either node if needed.
    /// Repeated calls for the same pair keep a single edge.
    pub fn add_dependency(&mut self, parent: &Path, child: &Path) {
        let from = self.add_file(parent);
        let to = self.add_file(child);
        self.graph.update_edge(from, to, ());
    }

    /// Get all files the given file directly depends on.
    pub fn dependencies(&self, path: &Path) -> Vec<PathBuf> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Get all files that directly depend on (import) the given file.
    pub fn dependents(&self, path: &Path) -> Vec<PathBuf> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &Path, direction: Direction) -> Vec<PathBuf> {
        let Some(&idx) = self.path_to_idx.get(path) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, direction)
            .filter_map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                self.graph.node_weight(other).cloned()
            })
            .collect()
    }

    /// Files that transitively depend on any of `changed`, the changed files
    /// themselves included. Only graph nodes passing `filter` are returned;
    /// rejected nodes are still walked through.
    pub fn affected<P: AsRef<Path>>(
        &self,
        changed: &[P],
        filter: Option<&dyn Fn(&Path) -> bool>,
    ) -> HashSet<PathBuf> {
        compute_affected(changed, self, filter)
    }

    /// All files currently in the graph.
    pub fn files(&self) -> impl Iterator<Item = &Path> + '_ {
        self.graph.node_weights().map(PathBuf::as_path)
    }

    /// Get current node count.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get current edge count.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Render the graph in Graphviz DOT format, labelling nodes with their paths.
    pub fn visualize(&self) -> String {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|_, _| String::new(),
            &|_, (_, node)| {
                let label = node.display().to_string().replace('"', "\\\"");
                format!("label = \"{label}\" ")
            },
        );
        format!("{dot:?}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(path: &str) -> PathBuf {
        PathBuf::from(path)
    }

    #[test]
    fn add_file_creates_node() {
        let mut graph = DepGraph::new();
        let path = p("src/foo.js");
        graph.add_file(&path);
        assert!(graph.has_file(&path));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn add_file_idempotent() {
        let mut graph = DepGraph::new();
        let path = p("src/foo.js");
        let idx1 = graph.add_file(&path);
        let idx2 = graph.add_file(&path);
        assert_eq!(idx1, idx2);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn add_dependency_creates_both_nodes() {
        let mut graph = DepGraph::new();
        graph.add_dependency(&p("a.js"), &p("b.js"));
        assert!(graph.has_file(&p("a.js")));
        assert!(graph.has_file(&p("b.js")));
        assert_eq!(graph.dependencies(&p("a.js")), vec![p("b.js")]);
    }

    #[test]
    fn add_dependency_keeps_single_edge() {
        let mut graph = DepGraph::new();
        graph.add_dependency(&p("a.js"), &p("b.js"));
        graph.add_dependency(&p("a.js"), &p("b.js"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn add_dependency_allows_self_loop() {
        let mut graph = DepGraph::new();
        graph.add_dependency(&p("a.js"), &p("a.js"));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.dependents(&p("a.js")), vec![p("a.js")]);
    }

    #[test]
    fn dependents_returns_importers() {
        let mut graph = DepGraph::new();
        let util = p("src/util.js");

        // a, b, c all import util
        graph.add_dependency(&p("src/a.js"), &util);
        graph.add_dependency(&p("src/b.js"), &util);
        graph.add_dependency(&p("src/c.js"), &util);

        let dependents = graph.dependents(&util);
        assert_eq!(dependents.len(), 3);
        assert!(dependents.contains(&p("src/a.js")));
        assert!(dependents.contains(&p("src/b.js")));
        assert!(dependents.contains(&p("src/c.js")));
    }

    #[test]
    fn unknown_file_has_no_neighbors() {
        let graph = DepGraph::new();
        assert!(graph.dependents(&p("nope.js")).is_empty());
        assert!(graph.dependencies(&p("nope.js")).is_empty());
    }

    #[test]
    fn affected_without_filter_returns_ancestors() {
        let mut graph = DepGraph::new();
        graph.add_dependency(&p("a"), &p("b"));
        graph.add_dependency(&p("b"), &p("c"));

        let affected = graph.affected(&[p("c")], None);
        let expected: HashSet<PathBuf> = [p("a"), p("b"), p("c")].into_iter().collect();
        assert_eq!(affected, expected);
    }

    #[test]
    fn affected_filter_traverses_rejected_nodes() {
        let mut graph = DepGraph::new();
        graph.add_dependency(&p("a"), &p("b"));
        graph.add_dependency(&p("b"), &p("c"));

        let only_a = |path: &Path| path == Path::new("a");
        let affected = graph.affected(&[p("c")], Some(&only_a));
        assert_eq!(affected, [p("a")].into_iter().collect());
    }

    #[test]
    fn visualize_emits_dot() {
        let mut graph = DepGraph::new();
        graph.add_dependency(&p("tests/a.test.js"), &p("src/a.js"));

        let dot = graph.visualize();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("label = \"tests/a.test.js\""));
        assert!(dot.contains("label = \"src/a.js\""));
        assert!(dot.contains("0 -> 1"));
    }

    #[test]
    fn files_lists_every_node() {
        let mut graph = DepGraph::new();
        graph.add_dependency(&p("a.js"), &p("b.js"));
        graph.add_file(&p("c.js"));

        let mut files: Vec<_> = graph.files().map(Path::to_path_buf).collect();
        files.sort();
        assert_eq!(files, vec![p("a.js"), p("b.js"), p("c.js")]);
    }
}
