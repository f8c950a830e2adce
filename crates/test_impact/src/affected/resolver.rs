//! Relative module resolution.
//!
//! Resolves `./x` style specifiers to files inside the workspace using a fixed
//! candidate order. Bare specifiers (package names) are never resolved.

use crate::normalize::path::normalize_lexically;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// How a specifier is turned into a file candidate.
#[derive(Debug, Clone, Copy)]
enum Candidate {
    /// `x` → `x.js`
    Extension(&'static str),
    /// `x` → `x/index.js`
    IndexFile(&'static str),
}

/// Candidates tried after the exact path, first match wins.
const CANDIDATES: &[Candidate] = &[
    Candidate::Extension("js"),
    Candidate::IndexFile("index.js"),
    Candidate::Extension("cjs"),
    Candidate::IndexFile("index.cjs"),
    Candidate::Extension("mjs"),
    Candidate::IndexFile("index.mjs"),
    Candidate::Extension("ts"),
    Candidate::IndexFile("index.ts"),
    Candidate::Extension("cts"),
    Candidate::IndexFile("index.cts"),
    Candidate::Extension("mts"),
    Candidate::IndexFile("index.mts"),
];

impl Candidate {
    fn apply(self, base: &Path) -> PathBuf {
        match self {
            Candidate::Extension(ext) => {
                let mut name = base.as_os_str().to_os_string();
                name.push(".");
                name.push(ext);
                PathBuf::from(name)
            }
            Candidate::IndexFile(file) => base.join(file),
        }
    }
}

/// Resolves module specifiers to workspace-relative file identifiers.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    workspace_root: PathBuf,
}

impl ModuleResolver {
    /// Create a resolver for the given workspace root.
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Resolve `specifier` as written in the file `from`.
    ///
    /// Returns None if:
    /// - the specifier is not relative (does not start with `.`)
    /// - no candidate exists on disk
    /// - the resolved path leaves the workspace
    pub fn resolve(&self, from: &Path, specifier: &str) -> Option<PathBuf> {
        if !specifier.starts_with('.') {
            return None;
        }

        let from_dir = from.parent().unwrap_or_else(|| Path::new(""));
        let resolved = self.resolve_module(&from_dir.join(specifier));
        if resolved.is_none() {
            debug!(
                from = %from.display(),
                specifier,
                "[affected] unresolved relative specifier"
            );
        }
        resolved
    }

    /// Resolve a module path (relative to the workspace root, extension
    /// optional) to the first existing candidate:
    /// exact file, `.js`, `/index.js`, `.cjs`, `/index.cjs`, `.mjs`,
    /// `/index.mjs`, `.ts`, `/index.ts`, `.cts`, `/index.cts`, `.mts`,
    /// `/index.mts`.
    pub fn resolve_module(&self, module: &Path) -> Option<PathBuf> {
        let base = normalize_lexically(module);
        if escapes_workspace(&base) {
            debug!(module = %module.display(), "[affected] module resolves outside workspace");
            return None;
        }

        if self.is_file(&base) {
            return Some(base);
        }

        CANDIDATES
            .iter()
            .map(|candidate| candidate.apply(&base))
            .find(|path| self.is_file(path))
    }

    fn is_file(&self, identifier: &Path) -> bool {
        !identifier.as_os_str().is_empty() && self.workspace_root.join(identifier).is_file()
    }
}

fn escapes_workspace(identifier: &Path) -> bool {
    identifier.is_absolute()
        || matches!(identifier.components().next(), Some(Component::ParentDir))
}
