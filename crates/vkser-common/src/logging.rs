use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "VKSER_LOG";

/// Initialize structured logging with environment filter.
/// Set VKSER_LOG=debug (or trace, info, warn, error) for verbosity control.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Same as [`init_logging`], falling back to `default_filter` when
/// VKSER_LOG is unset or unparsable.
pub fn init_logging_with_default(default_filter: &str) {
    fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

/// Install the subscriber unless one is already set.
/// Returns false if another subscriber won the race.
pub fn try_init_logging(default_filter: &str) -> bool {
    fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter))
}
