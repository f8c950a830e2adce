//! TypeScript/JavaScript syntax trees using tree-sitter.
//!
//! Wraps a parsed file behind a small surface: parse a source, walk every node,
//! and ask a node whether it is a `require`/`import` with a literal specifier.
//! Nothing outside this module touches tree-sitter types.

use crate::error::{ImpactError, ImpactResult};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// A parsed source file.
pub struct SourceTree {
    source: String,
    tree: Tree,
}

impl SourceTree {
    /// Parse `source`, picking the grammar from the extension of `path`.
    ///
    /// Files with syntax errors still produce a tree; tree-sitter recovers and
    /// the well-formed parts remain walkable.
    ///
    /// # Errors
    /// Returns `ImpactError::Parse` if the grammar cannot be loaded or the
    /// parser gives up on the input.
    pub fn parse(path: &Path, source: String) -> ImpactResult<Self> {
        let mut parser = Parser::new();
        let language = get_language_for_path(path);
        parser
            .set_language(&language)
            .map_err(|e| parse_error(path, &format!("failed to set language: {e}")))?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| parse_error(path, "parser returned no tree"))?;

        Ok(Self { source, tree })
    }

    /// Whether the parser had to recover from syntax errors.
    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Visit every node of the tree in document order.
    pub fn walk<'t, F>(&'t self, mut callback: F)
    where
        F: FnMut(SyntaxNode<'t>),
    {
        let mut cursor = self.tree.walk();
        loop {
            callback(SyntaxNode::new(cursor.node(), &self.source));
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }
}

fn get_language_for_path(path: &Path) -> tree_sitter::Language {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        // TSX is a superset of JavaScript with JSX.
        "tsx" | "jsx" | "js" | "mjs" | "cjs" => tree_sitter_typescript::LANGUAGE_TSX.into(),
        _ => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
    }
}

fn parse_error(path: &Path, reason: &str) -> ImpactError {
    ImpactError::Parse {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// A node of a `SourceTree`, carrying the source text it spans.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    node: Node<'t>,
    source: &'t str,
}

impl<'t> SyntaxNode<'t> {
    fn new(node: Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    /// Grammar kind, e.g. `call_expression`.
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Source text covered by the node.
    pub fn text(&self) -> &'t str {
        self.source.get(self.node.byte_range()).unwrap_or("")
    }

    /// Child stored under a grammar field such as `function` or `source`.
    pub fn field(&self, name: &str) -> Option<SyntaxNode<'t>> {
        self.node
            .child_by_field_name(name)
            .map(|node| SyntaxNode::new(node, self.source))
    }

    /// Named children, comments excluded.
    pub fn named_children(&self) -> Vec<SyntaxNode<'t>> {
        let mut cursor = self.node.walk();
        let children = self
            .node
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| SyntaxNode::new(child, self.source))
            .collect();
        children
    }

    /// Value of a string literal, or of a template literal without
    /// substitutions. Quotes are stripped, escapes are left as written.
    pub fn string_value(&self) -> Option<&'t str> {
        match self.kind() {
            "string" => strip_quotes(self.text()),
            "template_string" => {
                let has_substitution = self
                    .named_children()
                    .iter()
                    .any(|child| child.kind() == "template_substitution");
                if has_substitution {
                    None
                } else {
                    strip_quotes(self.text())
                }
            }
            _ => None,
        }
    }

    /// Name of the called identifier if this is a call like `name(...)`.
    pub fn callee_name(&self) -> Option<&'t str> {
        if self.kind() != "call_expression" {
            return None;
        }
        let callee = self.field("function")?;
        match callee.kind() {
            "identifier" | "import" => Some(callee.text()),
            _ => None,
        }
    }

    /// Arguments of a call expression.
    pub fn call_arguments(&self) -> Vec<SyntaxNode<'t>> {
        if self.kind() != "call_expression" {
            return Vec::new();
        }
        self.field("arguments")
            .map(|args| args.named_children())
            .unwrap_or_default()
    }

    /// Specifier of `require('x')`, or of a dynamic `import('x')`.
    pub fn require_specifier(&self) -> Option<&'t str> {
        match self.callee_name()? {
            "require" | "import" => self.call_arguments().first()?.string_value(),
            _ => None,
        }
    }

    /// Specifier of an import declaration: `import x from 'x'`,
    /// `import 'x'`, `export { x } from 'x'` and `import x = require('x')`.
    pub fn import_specifier(&self) -> Option<&'t str> {
        match self.kind() {
            "import_statement" | "export_statement" | "import_require_clause" => {
                self.field("source")?.string_value()
            }
            _ => None,
        }
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    let open = chars.next()?;
    let close = chars.next_back()?;
    if open == close && matches!(open, '\'' | '"' | '`') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}
