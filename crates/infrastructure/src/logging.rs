use ferrous_stub_domain::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber. `RUST_LOG` wins over the
/// configured level. Calling it again is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .try_init()
        .is_ok();

    if installed {
        info!("Logging initialized at level: {}", config.level);
    }
}
