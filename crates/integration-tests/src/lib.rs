//! Integration test support for Bramble.
//!
//! Provides in-memory fakes of the promotion engine's source traits so the
//! pricing service can be exercised end-to-end without a database.

pub mod fakes;

/// Initialize tracing for a test binary.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// Set `RUST_LOG` to see engine-level `debug!`/`warn!` output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
