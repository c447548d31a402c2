//! Tracing bootstrap.

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` wins over `filter`. Returns `false` if a subscriber was
/// already installed, which is normal in tests and embedded hosts.
pub fn init_tracing(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
