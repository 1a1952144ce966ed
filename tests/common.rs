use e2e_util::log::GoogleEventFormat;
use std::sync::Once;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub static INIT_LOGGER: Once = Once::new();

/// Initialize logging for tests with consistent configuration
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("error,e2e_util=debug,run_test=debug,run_async_test=debug"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .event_format(GoogleEventFormat)
            .with_test_writer()
            .init();

        debug!("Test logging initialized");
    });
}
