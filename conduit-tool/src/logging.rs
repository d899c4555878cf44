use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable overriding the configured level, in `EnvFilter` syntax.
pub const LOG_ENV: &str = "CONDUIT_LOG";

/// Install a compact stderr subscriber. Stdout stays reserved for command output.
pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("invalid log level {level:?}: {e}"))?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
