//! Tracing setup for embedding processes
//!
//! The library only emits `tracing` events; it never installs a subscriber
//! on its own. Binaries and test suites call [`init_tracing`] once (or many
//! times, later calls are no-ops).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a `fmt` subscriber filtered by `RUST_LOG`, or by
/// `default_filter` when `RUST_LOG` is unset or invalid.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    tracing_subscriber::registry().with(env_filter).with(console_layer).try_init().is_ok()
}
