#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use clap::Parser;
use std::path::PathBuf;
use test_impact::affected::discovery::discover_test_files;
use test_impact::affected::selection::build_graph;
use test_impact::affected::{select_tests, Selection, SelectionMode};
use test_impact::changes::ChangeSource;
use test_impact::normalize::path::display_identifier;
use test_impact::{logging, runner, ImpactConfig, ImpactError, ImpactResult};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "test-impact",
    version,
    about = "Run only the tests affected by changed files"
)]
struct Cli {
    /// Changed files (default: git diff against --base)
    #[arg()]
    files: Vec<PathBuf>,

    /// Workspace root (default: current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Config file, relative to the root (default: test-impact.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Revision to diff against when no files are given
    #[arg(long)]
    base: Option<String>,

    /// Print the selected tests without running them
    #[arg(long)]
    list: bool,

    /// Print the selection as JSON without running
    #[arg(long)]
    json: bool,

    /// Print the dependency graph as DOT and exit
    #[arg(long)]
    graph: bool,

    /// Log unresolved specifiers and plugin matches
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> ImpactResult<i32> {
    let cwd = std::env::current_dir().map_err(|source| ImpactError::Read {
        path: PathBuf::from("."),
        source,
    })?;
    let root = match cli.root {
        Some(root) => cwd.join(root),
        None => cwd.clone(),
    };
    let config = ImpactConfig::load(&root, cli.config.as_deref())?;

    if cli.graph {
        let test_files = discover_test_files(&root, &config.test_globs)?;
        let graph = build_graph(&root, &config, &test_files)?;
        println!("{}", graph.visualize());
        return Ok(0);
    }

    let changed = ChangeSource::from_args(cli.files, cli.base, &cwd)
        .changed_files(&root)
        .await?;
    let selection = select_tests(&root, &config, &changed)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&selection)?;
        println!("{json}");
        return Ok(0);
    }

    print_selection(&selection);
    if cli.list {
        return Ok(0);
    }

    if selection.test_files.is_empty() {
        info!("[affected] nothing to run");
        return Ok(0);
    }

    runner::run_tests(&config.runner, selection.test_args(), &root).await
}

fn print_selection(selection: &Selection) {
    eprintln!("Changed files:");
    for file in &selection.changed_files {
        eprintln!("  {}", display_identifier(file));
    }
    if let SelectionMode::FullRun { marker, trigger } = &selection.mode {
        eprintln!(
            "{} changed ({marker}), all tests are affected",
            display_identifier(trigger)
        );
    }
    for test in selection.test_args() {
        println!("{test}");
    }
}
