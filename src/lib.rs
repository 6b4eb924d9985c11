pub mod config;
pub mod triage; // Rule evaluation + guideline escalation

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries. Logs go to stderr so stdout stays
/// free for machine-readable output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{} triage v{}", config::APP_NAME, config::APP_VERSION);
}
