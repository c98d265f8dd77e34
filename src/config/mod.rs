//! Configuration module for the bootstrap runner.
//!
//! Every command the bootstrap runs is a named constant in `models`. This
//! module lets a configuration file override those constants without touching
//! the step sequence.
//!
//! # Module Structure
//!
//! - `loader`: finds and parses `bootstrap.toml` / `bootstrap.json`
//! - `validator`: rejects configurations the runner cannot execute
//!
//! # Configuration Flow
//!
//! 1. `loader::discover_config` looks in the start directory, then in
//!    `~/.config/fimage-bootstrap/`
//! 2. The file (if any) is parsed over the defaults
//! 3. `validator::validate_config` checks the result

pub mod loader;
pub mod validator;

use crate::error::ConfigError;
use crate::models::BootstrapConfig;
use std::path::{Path, PathBuf};

/// A validated configuration plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: BootstrapConfig,
    /// `None` when the built-in defaults are in use.
    pub source: Option<PathBuf>,
}

/// Load the configuration for a run started in `root`.
pub fn load_bootstrap_config(root: &Path) -> Result<LoadedConfig, ConfigError> {
    let source = loader::discover_config(root);

    let config = match &source {
        Some(path) => loader::load_config_from_file(path)?,
        None => BootstrapConfig::default(),
    };

    validator::validate_config(&config)?;

    Ok(LoadedConfig { config, source })
}
