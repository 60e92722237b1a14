//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes priority over the configured level; the formatter is
/// chosen by `logging.format` ("json" for machine-readable output, anything
/// else for human-readable output).
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow::anyhow!("invalid log filter {:?}: {}", config.level, e))?;

    if config.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
