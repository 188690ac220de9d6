//! Logging setup
//!
//! Library code only emits `tracing` events. The binary calls [`init`] once;
//! tests may call [`init_test`] as often as they like.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// Level comes from `RUST_LOG` (default `info`), e.g. `RUST_LOG=ivs=debug`.
/// Output goes to stderr.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Install a debug-level subscriber that writes through the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
