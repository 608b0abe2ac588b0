#![forbid(unsafe_code)]

//! Subscriber installation for binaries and demos.
//!
//! Library code only emits `tracing` events under the `flipboard.*`
//! targets; installing a subscriber is left to the host. This helper wires
//! a formatted subscriber filtered by the `FLIPBOARD_LOG` environment
//! variable (for example `FLIPBOARD_LOG=flipboard.flip=debug`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "FLIPBOARD_LOG";

/// Directives used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Build the filter from [`LOG_ENV`], falling back to [`DEFAULT_DIRECTIVES`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a global formatted subscriber. Returns `false` if one was
/// already installed.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_existing_subscriber() {
        let first = init();
        assert!(!init() || !first);
    }
}
