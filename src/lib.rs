pub mod config;
pub mod document; // Snapshot model, edit requests, offset-exact applier
pub mod extraction; // Model response parsing
pub mod grid; // Anchored lab grid filling
pub mod pipeline; // Fill orchestrator + diagnostic dumps
pub mod placeholders;
pub mod profiles; // Department grids and defaults
pub mod store;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// filter. Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!(version = config::APP_VERSION, "Tracing initialised");
}
