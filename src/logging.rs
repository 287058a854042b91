//! Logging setup for embedders of the library.
//!
//! The engine itself only emits `tracing` events; binaries embedding it
//! can call [`init`] to install a sensible subscriber.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes tracing with environment-based filtering.
///
/// The default level is `info`; override with the `RUST_LOG` environment
/// variable. Calling this twice panics (the subscriber is global), so
/// embedders with their own subscriber should skip it.
pub fn init() {
    init_with_level("info");
}

/// Initializes tracing with a specific default level (`debug`, `info`,
/// `warn`, `error`). `RUST_LOG` still takes precedence.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt().with_env_filter(filter).with_target(false).init();
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_env_filter_parses_levels() {
        for level in ["debug", "info", "warn", "error"] {
            let _ = EnvFilter::new(level);
        }
    }
}
