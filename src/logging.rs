//! Tracing setup shared by the Chronomarks binaries.
//!
//! Logs go to stderr so stdout stays free for protocol output.

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber filtered by `filter`.
///
/// Falls back to `info` when the directive does not parse. Calling it twice is
/// harmless; the second install is reported as an error and ignored by callers.
pub fn init_tracing(filter: &str) -> Result<(), String> {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| error.to_string())
}
