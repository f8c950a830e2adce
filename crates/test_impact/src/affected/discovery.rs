//! Test file discovery.
//!
//! Enumerates the test universe from glob patterns and decides whether a
//! graph node counts as a test file.

use crate::error::{ImpactError, ImpactResult};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Naming convention for test files: the file name contains one of the infixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFilePattern {
    infixes: Vec<String>,
}

impl TestFilePattern {
    pub fn new(infixes: Vec<String>) -> Self {
        Self { infixes }
    }

    /// Check if a path is a test file.
    pub fn is_test_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.infixes.iter().any(|infix| name.contains(infix.as_str()))
    }
}

impl Default for TestFilePattern {
    fn default() -> Self {
        Self::new(vec![".test.".to_string()])
    }
}

/// Enumerate all files under `workspace_root` matching any of `globs`.
///
/// Globs are relative to the root. `.gitignore` rules apply and `node_modules`
/// is always skipped. Results are workspace-relative and sorted.
///
/// # Errors
/// Returns an error for an invalid glob or a directory that cannot be walked.
pub fn discover_test_files(workspace_root: &Path, globs: &[String]) -> ImpactResult<Vec<PathBuf>> {
    if globs.is_empty() {
        return Ok(Vec::new());
    }

    let mut overrides = OverrideBuilder::new(workspace_root);
    for glob in globs {
        overrides.add(glob).map_err(ImpactError::Glob)?;
    }
    let overrides = overrides.build().map_err(ImpactError::Glob)?;

    let walker = WalkBuilder::new(workspace_root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .overrides(overrides)
        .filter_entry(|entry| entry.file_name() != "node_modules" && entry.file_name() != ".git")
        .build();

    let mut tests = Vec::new();
    for entry in walker {
        let entry = entry.map_err(ImpactError::Walk)?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(workspace_root) {
            tests.push(relative.to_path_buf());
        }
    }

    tests.sort();
    Ok(tests)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn default_globs() -> Vec<String> {
        vec!["**/*.test.{js,cjs,mjs,ts,cts,mts}".to_string()]
    }

    #[test]
    fn is_test_file_detects_infix() {
        let pattern = TestFilePattern::default();
        assert!(pattern.is_test_file(Path::new("tests/foo.test.js")));
        assert!(pattern.is_test_file(Path::new("foo.test.mts")));
        assert!(pattern.is_test_file(Path::new("tests/integration/20.command.functions.test.cjs")));

        assert!(!pattern.is_test_file(Path::new("foo.js")));
        assert!(!pattern.is_test_file(Path::new("test/foo.js")));
        assert!(!pattern.is_test_file(Path::new("src/latest.js")));
    }

    #[test]
    fn custom_infixes() {
        let pattern = TestFilePattern::new(vec![".spec.".to_string(), ".e2e.".to_string()]);
        assert!(pattern.is_test_file(Path::new("a.spec.ts")));
        assert!(pattern.is_test_file(Path::new("a.e2e.js")));
        assert!(!pattern.is_test_file(Path::new("a.test.js")));
    }

    #[test]
    fn discovers_matching_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tests/a.test.js");
        touch(dir.path(), "tests/integration/b.test.mjs");
        touch(dir.path(), "src/c.test.ts");
        touch(dir.path(), "src/c.ts");
        touch(dir.path(), "tests/utils/call-cli.js");

        let tests = discover_test_files(dir.path(), &default_globs()).unwrap();
        assert_eq!(
            tests,
            vec![
                PathBuf::from("src/c.test.ts"),
                PathBuf::from("tests/a.test.js"),
                PathBuf::from("tests/integration/b.test.mjs"),
            ]
        );
    }

    #[test]
    fn skips_node_modules() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "node_modules/pkg/index.test.js");
        touch(dir.path(), "tests/a.test.js");

        let tests = discover_test_files(dir.path(), &default_globs()).unwrap();
        assert_eq!(tests, vec![PathBuf::from("tests/a.test.js")]);
    }

    #[test]
    fn respects_gitignore() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "dist/\n").unwrap();
        touch(dir.path(), "dist/a.test.js");
        touch(dir.path(), "tests/a.test.js");

        let tests = discover_test_files(dir.path(), &default_globs()).unwrap();
        assert_eq!(tests, vec![PathBuf::from("tests/a.test.js")]);
    }

    #[test]
    fn scoped_glob_limits_universe() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tests/unit/a.test.js");
        touch(dir.path(), "tests/integration/b.test.js");

        let globs = vec!["tests/unit/**/*.test.js".to_string()];
        let tests = discover_test_files(dir.path(), &globs).unwrap();
        assert_eq!(tests, vec![PathBuf::from("tests/unit/a.test.js")]);
    }

    #[test]
    fn no_globs_no_tests() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tests/a.test.js");
        assert!(discover_test_files(dir.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn invalid_glob_is_error() {
        let dir = tempdir().unwrap();
        let err = discover_test_files(dir.path(), &["tests/{a".to_string()]).unwrap_err();
        assert!(matches!(err, ImpactError::Glob(_)));
    }
}
