//! Config Command
//!
//! Manage Slidesmith configuration.
//!
//! Usage:
//!   slidesmith config show [--json]
//!   slidesmith config path
//!   slidesmith config init [--force]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(as_json: bool) -> Result<()> {
    ConfigLoader::show_config(as_json)
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize project configuration
pub fn init(force: bool) -> Result<()> {
    let existed = ConfigLoader::project_config_path().exists();
    let path = ConfigLoader::init_project(force)?;
    let output = Output::new();

    if existed && !force {
        output.warning(&format!(
            "Config already exists: {} (use --force to overwrite)",
            path.display()
        ));
    } else {
        output.success("Initialized project configuration");
        output.field("Config", path.display());
    }
    Ok(())
}
