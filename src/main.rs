use scoring_api::{api, config::AppConfig, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up AUTH_SALT, SCORING_PORT, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();
    logging::init(&config.server)?;
    tracing::info!("Starting scoring API in {:?} mode", config.environment);

    api::serve(config).await
}
