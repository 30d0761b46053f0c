//! Tracing subscriber for test runs.

use tracing_subscriber::{EnvFilter, fmt};

/// Default filter when `RUST_LOG` is not provided.
const DEFAULT_TEST_LOG_LEVEL: &str = "debug";

/// Install a subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_LOG_LEVEL));

    // A second install fails once a subscriber is set; that is expected.
    let _ = fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
