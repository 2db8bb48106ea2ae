//! Serve command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use trailmap_core::Config;
use trailmap_server::ServeArgs;

pub async fn serve(config_path: &Path, args: &ServeArgs) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load {:?}", config_path))?;
    trailmap_server::run(args, &config).await
}
