//! Path normalization for graph node identifiers.
//!
//! Every node in the dependency graph is a workspace-relative path with `.`
//! and `..` components folded away, so the same file always maps to the same
//! identifier no matter which importer reached it.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path string to use forward slashes only.
///
/// - Converts backslashes to forward slashes
/// - Collapses consecutive slashes
pub fn normalize_slashes(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut last_was_slash = false;

    for c in path.chars() {
        let is_slash = c == '/' || c == '\\';
        if is_slash {
            if !last_was_slash {
                result.push('/');
            }
            last_was_slash = true;
        } else {
            result.push(c);
            last_was_slash = false;
        }
    }
    result
}

/// Folds `.` and `..` components without touching the file system.
///
/// A `..` that would climb above the start of a relative path is kept, a `..`
/// directly under the root is dropped.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    parts.iter().collect()
}

/// Converts a user or VCS supplied path into a graph identifier.
///
/// Absolute paths under `workspace_root` become relative to it; everything
/// else is normalized as given.
pub fn to_identifier(path: &Path, workspace_root: &Path) -> PathBuf {
    let normalized = normalize_lexically(path);
    if normalized.is_absolute() {
        let root = normalize_lexically(workspace_root);
        if let Ok(relative) = normalized.strip_prefix(&root) {
            return relative.to_path_buf();
        }
    }
    normalized
}

/// Renders an identifier for output, always with forward slashes.
pub fn display_identifier(path: &Path) -> String {
    normalize_slashes(&path.to_string_lossy())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_converts_backslashes() {
        assert_eq!(normalize_slashes("foo\\bar\\baz"), "foo/bar/baz");
    }

    #[test]
    fn normalize_collapses_consecutive_slashes() {
        assert_eq!(normalize_slashes("foo//bar///baz"), "foo/bar/baz");
    }

    #[test]
    fn normalize_handles_empty_string() {
        assert_eq!(normalize_slashes(""), "");
    }

    #[test]
    fn lexical_drops_current_dir() {
        assert_eq!(
            normalize_lexically(Path::new("./src/./utils/index.js")),
            PathBuf::from("src/utils/index.js")
        );
    }

    #[test]
    fn lexical_folds_parent_dir() {
        assert_eq!(
            normalize_lexically(Path::new("tests/integration/../../src/lib/fs.js")),
            PathBuf::from("src/lib/fs.js")
        );
    }

    #[test]
    fn lexical_keeps_leading_parent_dir() {
        assert_eq!(
            normalize_lexically(Path::new("../shared/a.js")),
            PathBuf::from("../shared/a.js")
        );
    }

    #[test]
    fn lexical_stops_at_root() {
        assert_eq!(
            normalize_lexically(Path::new("/../etc/hosts")),
            PathBuf::from("/etc/hosts")
        );
    }

    #[test]
    fn identifier_strips_workspace_root() {
        let id = to_identifier(Path::new("/repo/src/a.js"), Path::new("/repo"));
        assert_eq!(id, PathBuf::from("src/a.js"));
    }

    #[test]
    fn identifier_keeps_relative_paths() {
        let id = to_identifier(Path::new("./src/../src/a.js"), Path::new("/repo"));
        assert_eq!(id, PathBuf::from("src/a.js"));
    }

    #[test]
    fn identifier_keeps_foreign_absolute_paths() {
        let id = to_identifier(Path::new("/elsewhere/a.js"), Path::new("/repo"));
        assert_eq!(id, PathBuf::from("/elsewhere/a.js"));
    }

    #[test]
    fn display_uses_forward_slashes() {
        assert_eq!(display_identifier(Path::new("src/a.js")), "src/a.js");
    }
}
