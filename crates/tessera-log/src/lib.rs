//! Structured logging and diagnostic sinks for Tessera.
//!
//! Logging goes through the `tracing` ecosystem: console output with
//! uptime timestamps and module paths, plus an optional JSON log file in
//! debug builds. Long-running terrain operations report progress lines
//! through a [`DiagnosticSink`] handed to them by the caller.

mod sink;

pub use sink::{DiagnosticSink, MemorySink, NullSink, TracingSink};

use std::path::Path;
use tessera_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,rayon=warn";

/// Initialize the tracing subscriber.
///
/// Sets up structured logging with:
/// - Console output with uptime timestamps, module paths, and severity levels
/// - JSON file logging in debug builds (optional)
/// - Environment-based filtering (respects RUST_LOG)
/// - Integration with the config `debug.log_level` setting
///
/// # Examples
///
/// ```no_run
/// use tessera_log::init_logging;
/// use tessera_config::Config;
///
/// init_logging(None, false, None);
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);

    // RUST_LOG wins over the config value
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true) // worker pool threads are named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("tessera.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => {
            format!("{},rayon=warn", config.debug.log_level)
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}
