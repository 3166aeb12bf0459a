//! Log subscriber setup for binaries and test harnesses using this crate.
//!
//! Library code only emits `tracing` events; nothing is printed unless a
//! subscriber is installed, either by the caller or via [`init_logging`].

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the verbosity-derived filter.
pub const LOG_LEVEL_ENV: &str = "RELEASE_TEST_LOG_LEVEL";

/// Map a verbosity count to a filter directive: 0 warn, 1 info, 2 debug, 3+ trace.
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr fmt subscriber.
///
/// `RELEASE_TEST_LOG_LEVEL` takes precedence over `verbosity`. Safe to call
/// more than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(verbosity_to_directive(0), "warn");
        assert_eq!(verbosity_to_directive(1), "info");
        assert_eq!(verbosity_to_directive(2), "debug");
        assert_eq!(verbosity_to_directive(3), "trace");
        assert_eq!(verbosity_to_directive(u8::MAX), "trace");
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(0);
        init_logging(2);
    }
}
