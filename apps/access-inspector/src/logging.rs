use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::config::LoggingConfig;

/// Overrides the configured filter entirely, e.g. `DDS_LOG=access_control=trace`.
pub const LOG_ENV: &str = "DDS_LOG";

/// Install the global subscriber. Output goes to stderr so stdout stays
/// machine-readable.
///
/// # Errors
/// Fails if the configured level is not a valid filter directive.
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => {
            let level = effective_level(&config.level, verbose);
            EnvFilter::try_new(level)
                .with_context(|| format!("invalid logging.level '{level}'"))?
        }
    };

    let registry = Registry::default().with(filter);
    if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
    }
    Ok(())
}

/// `-v` info, `-vv` debug, `-vvv` trace; otherwise the configured level.
fn effective_level(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
