use std::path::PathBuf;

use anyhow::Context;

/// Load `.env` into the process environment.
///
/// Must run before the first config build, which snapshots the environment.
/// A missing file is fine; a file that can't be read or parsed is an error.
pub async fn init_env() -> anyhow::Result<Option<PathBuf>> {
    loaded(dotenvy::dotenv())
}

fn loaded(result: Result<PathBuf, dotenvy::Error>) -> anyhow::Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err).context("failed to load `.env`"),
    }
}
