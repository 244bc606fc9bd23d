//! Logging initialization for host applications.
//!
//! The crate itself only emits `tracing` events; installing a subscriber is
//! the host's job. This helper wires up the conventional fmt subscriber with
//! an environment-driven filter for hosts and tests that do not bring their
//! own.

use crate::constants::DEFAULT_LOG_FILTER;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber filtered by `RUST_LOG`.
///
/// Falls back to [`DEFAULT_LOG_FILTER`] when `RUST_LOG` is unset. Calling
/// this when a subscriber is already installed is a no-op, so hosts and test
/// harnesses may call it unconditionally.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
