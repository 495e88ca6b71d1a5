use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup logging.
/// By default, it will only show logs from our crate at the info level.
///
/// This function sets up logging for the application.
/// Passing `debug = true` (the `-D` flag) raises the default level to debug.
/// The log level can be overridden by setting the `STRATUS_LOG` environment variable.
/// If the `STRATUS_LOG_ALL` environment variable is set, it will show logs from all crates at the specified level.
pub fn setup_logging(debug: bool) {
    // Get the log level from the environment variable.
    let default_level = if debug { "debug" } else { "info" };
    let log_level = std::env::var("STRATUS_LOG").unwrap_or_else(|_| default_level.to_string());

    // Check if we should show logs from all crates.
    let show_all_logs = std::env::var("STRATUS_LOG_ALL").is_ok();

    // The filter is either "log_level" or "stratus_cli=log_level".
    let filter = if show_all_logs {
        log_level
    } else {
        format!("stratus_cli={}", log_level)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();
}
