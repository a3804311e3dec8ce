mod env;
mod tracing;

pub async fn init_base() -> anyhow::Result<()> {
    let dotenv = env::init_env().await;
    tracing::init_tracing().await;

    match dotenv? {
        Some(path) => ::tracing::info!("loaded environment from {}", path.display()),
        None => ::tracing::debug!("no `.env` file found, using process environment only"),
    }
    Ok(())
}
