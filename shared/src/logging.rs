//! Shared logging utilities for consistent tracing across the check

use chrono::{DateTime, Local};
use tracing::{error, info};

/// Crate-level filter directives for the given base level
pub fn filter_directives(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("supervisord_check={base_level},shared={base_level},reqwest=warn,hyper=warn")
}

/// Initialize tracing subscriber with an optional log level
///
/// `RUST_LOG` takes precedence over the level passed in when it is set.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let directives = filter_directives(log_level);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Local> = Local::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for instance-aware info logging
#[macro_export]
macro_rules! check_info {
    ($instance:expr, $($arg:tt)*) => {
        tracing::info!(
            instance = %$instance,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for instance-aware warning logging
#[macro_export]
macro_rules! check_warn {
    ($instance:expr, $($arg:tt)*) => {
        tracing::warn!(
            instance = %$instance,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for instance-aware error logging
#[macro_export]
macro_rules! check_error {
    ($instance:expr, $($arg:tt)*) => {
        tracing::error!(
            instance = %$instance,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for instance-aware debug logging
#[macro_export]
macro_rules! check_debug {
    ($instance:expr, $($arg:tt)*) => {
        tracing::debug!(
            instance = %$instance,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(timestamp = format_timestamp(), "🚀 Starting {}", details);
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(reason: &str) {
    info!(timestamp = format_timestamp(), "🛑 Shutting down: {}", reason);
}

/// Contextual logging helper for error conditions
pub fn log_error(instance: &str, context: &str, error: &dyn std::fmt::Display) {
    error!(
        instance = %instance,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(instance: &str, message: &str) {
    info!(
        instance = %instance,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
