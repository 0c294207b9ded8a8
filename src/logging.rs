//! Unified logging for debug output.
//!
//! Compact timestamped logging with per-module level configuration.
//! `RUST_LOG` overrides the settings file at runtime.
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! default = "warn"  # quiet by default
//!
//! [logging.modules]
//! semantic = "debug"
//! ```
//!
//! # Environment Variable
//!
//! ```bash
//! RUST_LOG=debug semcompare search "making bread"
//! RUST_LOG=semantic=debug,server=info semcompare serve
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Build the filter directive string from config.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.default.clone();
    for (module, level) in &config.modules {
        filter_str.push_str(&format!(",{module}={level}"));
    }
    filter_str
}

/// Initialize logging with configuration.
///
/// Call once at startup. Later calls are no-ops. Logs go to stderr so they
/// never interleave with result output on stdout.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(filter_directives(config))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

/// Log an event under a component target, so `[logging.modules]` can filter it.
///
/// # Examples
/// ```ignore
/// log_event!("server", "listening", "{bind}");
/// log_event!("verify", "done");
/// ```
#[macro_export]
macro_rules! log_event {
    ($handler:expr, $event:expr) => {
        tracing::info!(target: $handler, "{}", $event)
    };
    ($handler:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: $handler, "{}: {}", $event, format!($($arg)*))
    };
}

/// Debug-only event logging.
#[macro_export]
macro_rules! debug_event {
    ($handler:expr, $event:expr) => {
        tracing::debug!(target: $handler, "{}", $event)
    };
    ($handler:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!(target: $handler, "{}: {}", $event, format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_filter_directives() {
        let config = LoggingConfig {
            default: "warn".to_string(),
            modules: BTreeMap::from([
                ("semantic".to_string(), "debug".to_string()),
                ("server".to_string(), "info".to_string()),
            ]),
        };
        assert_eq!(
            filter_directives(&config),
            "warn,semantic=debug,server=info"
        );
    }

    #[test]
    fn test_default_is_quiet() {
        assert_eq!(filter_directives(&LoggingConfig::default()), "warn");
    }
}
