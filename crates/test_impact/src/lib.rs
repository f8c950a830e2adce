//! Change-impact analysis for JavaScript/TypeScript test suites.
//!
//! Builds a file dependency graph from the test files of a workspace and
//! selects the tests that transitively depend on a set of changed files.

pub mod affected;
pub mod changes;
pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod runner;

pub use config::ImpactConfig;
pub use error::{ImpactError, ImpactResult};
