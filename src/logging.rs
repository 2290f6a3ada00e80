use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level; a configured log file replaces stderr.
pub fn init(config: &ServerConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))
}
