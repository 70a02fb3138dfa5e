//! Test-run logging setup.
//!
//! Pagina emits `tracing` events (field resolution, session lifecycle,
//! navigation waits). Call [`init`] once from a test binary or example to get
//! them printed, filtered through `RUST_LOG`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a global `tracing` subscriber with `RUST_LOG` filtering.
///
/// Safe to call from every test; only the first call installs.
pub fn init() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
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
