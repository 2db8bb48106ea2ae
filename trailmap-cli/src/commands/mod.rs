//! CLI command implementations.

pub mod generate;
pub mod init;
pub mod outline;
pub mod render;
pub mod serve;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

pub use generate::generate_roadmap;
pub use init::init_project;
pub use outline::outline_file;
pub use render::render_file;
pub use serve::serve;

/// Read a markdown input, where `-` means stdin.
pub(crate) fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))
}

/// Write to `output` if given, otherwise print to stdout.
pub(crate) fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{contents}"),
    }
    Ok(())
}
