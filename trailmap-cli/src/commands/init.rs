//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../trailmap.yml.example");

/// Write a default trailmap.yml into `path` (or the current directory).
pub fn init_project(path: Option<&Path>, force: bool) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    let config_path = root.join("trailmap.yml");
    if config_path.exists() && !force {
        bail!(
            "{:?} already exists (use --force to overwrite)",
            config_path
        );
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    println!("✓ trailmap initialized in {:?}", root);
    println!("  - Edit trailmap.yml to change the site title or model");
    println!("  - Set TRAILMAP_API_KEY, then run `trailmap serve`");
    Ok(())
}
