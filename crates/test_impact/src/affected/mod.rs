//! Affected test selection module.
//!
//! Provides import parsing, module resolution, the dependency graph, and
//! affected computation to run only the tests affected by changed files.

pub mod compute;
pub mod discovery;
pub mod graph;
pub mod parser;
pub mod plugins;
pub mod resolver;
pub mod selection;
pub mod visitor;

pub use graph::DepGraph;
pub use plugins::VisitorPlugin;
pub use resolver::ModuleResolver;
pub use selection::{select_tests, Selection, SelectionMode};
pub use visitor::{visit, VisitState};
