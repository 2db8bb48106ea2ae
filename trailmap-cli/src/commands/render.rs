//! Render command implementation.

use anyhow::{Context, Result};
use askama::Template;
use std::path::Path;
use trailmap_core::{build_html, Config};
use trailmap_render::RoadmapPageTemplate;

use super::{read_input, write_output};

pub fn render_file(
    config_path: &Path,
    input: &Path,
    standalone: bool,
    output: Option<&Path>,
) -> Result<()> {
    let markdown = read_input(input)?;

    let html = if standalone {
        let config = Config::load_or_default(config_path)
            .with_context(|| format!("Failed to load {:?}", config_path))?;
        RoadmapPageTemplate::new(&config.site, &markdown)
            .render()
            .context("Failed to render roadmap page")?
    } else {
        build_html(&markdown)
    };

    write_output(output, &html)
}
