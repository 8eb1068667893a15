use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const ENV_LOG: &str = "CMDTIME_LOG";

/// Install the global subscriber. Logs go to stderr so hook output on
/// stdout stays clean for `eval`.
pub fn init_logging(level: Option<&str>, no_color: bool) {
    // An explicit --log-level wins over CMDTIME_LOG; default is "warn".
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_env(ENV_LOG).ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();
}
