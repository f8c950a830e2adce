//! Visitor plugins: dependency edges that are not written as imports.
//!
//! Integration tests often start the CLI as a subprocess instead of importing
//! the command they exercise. The plugins here recognize those calls and map
//! the command name to its implementation module, so the test still depends on
//! it in the graph.

use super::parser::SyntaxNode;
use super::resolver::ModuleResolver;
use std::path::{Path, PathBuf};

/// A rule that may turn a syntax node into an extra dependency.
pub trait VisitorPlugin: Send + Sync {
    fn id(&self) -> &str;

    /// Workspace-relative file the node depends on, if the node matches.
    fn try_resolve(&self, node: SyntaxNode<'_>) -> Option<PathBuf>;
}

/// Maps CLI command names to command implementation files.
///
/// `build` resolves to `<dir>/build/build` then `<dir>/build`;
/// `functions:create` to `<dir>/functions/functions-create` then
/// `<dir>/functions/create`. Each candidate goes through module resolution.
#[derive(Debug, Clone)]
pub struct CommandModules {
    resolver: ModuleResolver,
    commands_dir: PathBuf,
}

impl CommandModules {
    pub fn new(resolver: ModuleResolver, commands_dir: PathBuf) -> Self {
        Self {
            resolver,
            commands_dir,
        }
    }

    pub fn resolve(&self, command: &str) -> Option<PathBuf> {
        if !is_command_name(command) {
            return None;
        }

        let (base, sub) = match command.split_once(':') {
            Some((base, sub)) => (base, Some(sub)),
            None => (command, None),
        };
        let dir = self.commands_dir.join(base);
        let candidates = match sub {
            Some(sub) => [dir.join(format!("{base}-{sub}")), dir.join(sub)],
            None => [dir.join(base), dir.clone()],
        };

        candidates
            .iter()
            .find_map(|candidate| self.resolver.resolve_module(candidate))
    }
}

fn is_command_name(command: &str) -> bool {
    !command.is_empty()
        && !command.starts_with('-')
        && !command.starts_with(':')
        && command
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_'))
}

/// First element of an array literal, when it is a command rather than a flag.
fn command_in_array<'t>(node: &SyntaxNode<'t>) -> Option<&'t str> {
    if node.kind() != "array" {
        return None;
    }
    let first = node.named_children().into_iter().next()?;
    let command = first.string_value()?;
    if command.starts_with('-') {
        return None;
    }
    Some(command)
}

/// Recognizes `callCli(['<command>', ...])`.
pub struct CallCliPlugin {
    callee: String,
    commands: CommandModules,
}

impl CallCliPlugin {
    pub fn new(callee: impl Into<String>, commands: CommandModules) -> Self {
        Self {
            callee: callee.into(),
            commands,
        }
    }
}

impl VisitorPlugin for CallCliPlugin {
    fn id(&self) -> &str {
        "call-cli"
    }

    fn try_resolve(&self, node: SyntaxNode<'_>) -> Option<PathBuf> {
        if node.callee_name()? != self.callee {
            return None;
        }
        let args = node.call_arguments();
        let command = command_in_array(args.first()?)?;
        self.commands.resolve(command)
    }
}

/// Recognizes `execa(cliPath, ['<command>', ...], ...)`.
pub struct ExecaCliPlugin {
    cli_path_identifier: String,
    commands: CommandModules,
}

impl ExecaCliPlugin {
    pub fn new(cli_path_identifier: impl Into<String>, commands: CommandModules) -> Self {
        Self {
            cli_path_identifier: cli_path_identifier.into(),
            commands,
        }
    }
}

impl VisitorPlugin for ExecaCliPlugin {
    fn id(&self) -> &str {
        "execa-cli"
    }

    fn try_resolve(&self, node: SyntaxNode<'_>) -> Option<PathBuf> {
        if node.callee_name()? != "execa" {
            return None;
        }
        let args = node.call_arguments();
        let [cli, command_args, ..] = args.as_slice() else {
            return None;
        };
        if cli.kind() != "identifier" || cli.text() != self.cli_path_identifier {
            return None;
        }
        let command = command_in_array(command_args)?;
        self.commands.resolve(command)
    }
}

/// The CLI subprocess plugins, sharing one command root.
pub fn cli_plugins(
    resolver: &ModuleResolver,
    commands_dir: &Path,
    call_cli_identifier: &str,
    cli_path_identifier: &str,
) -> Vec<Box<dyn VisitorPlugin>> {
    let commands = CommandModules::new(resolver.clone(), commands_dir.to_path_buf());
    vec![
        Box::new(CallCliPlugin::new(call_cli_identifier, commands.clone())),
        Box::new(ExecaCliPlugin::new(cli_path_identifier, commands)),
    ]
}
