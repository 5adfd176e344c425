//! Diagnostic logging setup
//!
//! Logs go to stderr; stdout carries only the results the workflow reads.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "ci_helpers=warn";

/// Filter used with `--verbose`
const VERBOSE_FILTER: &str = "ci_helpers=debug,info";

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
