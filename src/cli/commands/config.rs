//! Config Command
//!
//! Manage reporoast configuration.
//!
//! Usage:
//!   reporoast config show [-f toml|json]
//!   reporoast config path
//!   reporoast config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{Result, RoastError};

/// Show the effective configuration (all layers merged, secrets omitted)
pub fn show(format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" => false,
        other => {
            return Err(RoastError::Config(format!(
                "Invalid format '{}'. Valid values: toml, json",
                other
            )));
        }
    };

    let config = ConfigLoader::load()?;
    println!("{}", ConfigLoader::render(&config, as_json)?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let output = Output::new();

    if global {
        let dir = ConfigLoader::init_global(force)?;
        output.success("Initialized global configuration");
        println!("  Directory: {}", dir.display());
        if let Some(config_path) = ConfigLoader::global_config_path() {
            println!("  Config:    {}", config_path.display());
        }
    } else {
        let dir = ConfigLoader::init_project(force)?;
        output.success("Initialized project configuration");
        println!("  Directory: {}", dir.display());
        println!(
            "  Config:    {}",
            ConfigLoader::project_config_path().display()
        );
    }
    Ok(())
}
