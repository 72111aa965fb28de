// ABOUTME: Init command implementation.
// ABOUTME: Writes a settings template into a project directory.

use buzzcraft_deploy::config::init_settings;
use buzzcraft_deploy::error::Result;
use buzzcraft_deploy::output::Output;
use std::env;
use std::path::PathBuf;

pub fn init(dir: Option<PathBuf>, force: bool, output: &Output) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };

    let path = init_settings(&dir, force)?;
    output.success(&format!("Wrote {}", path.display()));
    Ok(())
}
