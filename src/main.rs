mod bootstrap;
mod config;

use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_base().await?;

    let config = AppConfig::init().await?;
    tracing::info!(
        app = %config.app_name,
        server = %format!("{}:{}", config.server.host, config.server.port),
        "configuration loaded"
    );

    println!("{}", serde_json::to_string_pretty(config)?);

    Ok(())
}
