use cfgbind_core::{Config, Validate};
use serde::Serialize;
use tokio::sync::OnceCell;

static APP: OnceCell<AppConfig> = OnceCell::const_new();

#[derive(Config, Validate, Debug, Serialize)]
#[config(name = "Server")]
pub struct ServerConfig {
    #[config(env = "SERVER_HOST", default = "0.0.0.0")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub host: String,
    #[config(env = "SERVER_PORT", default = "3000")]
    #[validate(range(min = 1, message = "must be a non-zero port"))]
    pub port: u16,
}

#[derive(Config, Validate, Debug, Serialize)]
#[config(name = "Database")]
pub struct DatabaseConfig {
    #[config(env = "DATABASE_URL")]
    pub url: Option<String>,
    #[config(env = "DATABASE_MAX_CONNECTIONS", default = "10")]
    #[validate(range(min = 1, max = 1000, message = "must be between 1 and 1000"))]
    pub max_connections: u32,
    #[config(env = "DATABASE_LOGGING", default = "false")]
    pub logging: bool,
}

#[derive(Config, Validate, Debug, Serialize)]
#[config(name = "App")]
pub struct AppConfig {
    #[config(env, default = "cfgbind")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub app_name: String,
    #[config(env, parser = parse_list)]
    pub allowed_origins: Vec<String>,
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub database: DatabaseConfig,
}

/// Comma separated list, blanks dropped. An unset variable is an empty list.
fn parse_list(raw: Option<&str>) -> anyhow::Result<Vec<String>> {
    Ok(raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

impl AppConfig {
    /// Build and validate the config once per process.
    pub async fn init() -> anyhow::Result<&'static AppConfig> {
        APP.get_or_try_init(|| async {
            AppConfig::build_validated().map_err(|err| anyhow::anyhow!("invalid configuration: {err}"))
        })
        .await
    }
}
