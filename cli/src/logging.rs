use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive string. When set,
/// it takes precedence over the `-v` flags.
pub(crate) const LOG_ENV_VAR: &str = "STRAND_LOG";

/// Pick the default filter level from the number of `-v` flags.
pub(crate) fn default_level(verbosity: u64) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. Log lines go to stderr so they never mix
/// with command output.
pub(crate) fn init(verbosity: u64) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    // A subscriber may already be installed (in-process tests run many
    // commands); the first one wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
