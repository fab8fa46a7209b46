//! Shared start-up for the storefront programs.
//!
//! Each binary resolves [`StoreConfig`] from the environment, installs a
//! stderr `tracing` subscriber filtered by the configured directive, and
//! builds a [`Store`] from the configured connection string.

use storefront_db::{DEFAULT_LOG_FILTER, StoreConfig};
use storefront_sqlite::Store;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Later calls are ignored.
///
/// An unparsable `filter` falls back to [`DEFAULT_LOG_FILTER`].
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Resolves configuration, starts logging, and builds the store handle.
pub fn bootstrap() -> Result<Store, String> {
    let config = StoreConfig::from_env().map_err(|e| format!("Failed to load configuration: {e}"))?;
    init_tracing(&config.log_filter);
    let store = Store::from_config(&config)
        .map_err(|e| format!("Invalid database URL '{}': {e}", config.database_url))?;
    debug!(url = %store.url(), "resolved store");
    Ok(store)
}

/// Prints `error: {err}` to stderr and exits with status 1 on failure.
pub fn exit_on_error(result: Result<(), String>) {
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
