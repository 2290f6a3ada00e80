use clap::Args;

use crate::config::AppConfig;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(short, long, help = "Port to listen on (overrides SCORING_PORT)")]
    pub port: Option<u16>,

    #[arg(short, long, help = "Write logs to this file instead of stderr")]
    pub log: Option<String>,
}

impl ServeArgs {
    /// Command-line flags take precedence over the environment
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(log) = &self.log {
            config.server.log_file = Some(log.clone());
        }
    }
}

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting scoring API in {:?} mode", config.environment);
    crate::api::serve(config).await
}
