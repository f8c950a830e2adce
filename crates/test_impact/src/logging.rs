//! Diagnostic logging.
//!
//! Status lines go to stderr through `tracing`; stdout is reserved for the
//! selected test list, JSON, or DOT output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "test_impact=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; `verbose` raises the default to `debug`, which includes
/// unresolved specifiers and plugin matches.
pub fn init(verbose: bool) {
    let default = if verbose { "test_impact=debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();
}
