//! Command implementations.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use seogen_core::Config;

pub mod generate;
pub mod redirect;
pub mod watch;

/// Load the configuration file, if any, with environment overrides.
pub fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::info!(?config_path, "No configuration file, using defaults");
    }
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}
