use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout only carries the rendered config.
///
/// The level comes from `RUST_LOG`, `info` when unset or invalid.
pub async fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
