//! Config file loader and serialization.

use crate::error::ConfigError;
use crate::models::BootstrapConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched, in order, in the directory the bootstrap starts from.
pub const LOCAL_CONFIG_FILES: &[&str] = &["bootstrap.toml", "bootstrap.json"];

/// Get the global config path: ~/.config/fimage-bootstrap/bootstrap.toml
pub fn get_global_config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::ValidationFailed("Cannot determine home directory".to_string())
    })?;

    Ok(home.join(".config/fimage-bootstrap").join("bootstrap.toml"))
}

/// Find the configuration file that applies to a run started in `root`.
///
/// Local files win over the global one. Returns `None` when no file exists,
/// in which case the built-in defaults apply.
pub fn discover_config(root: &Path) -> Option<PathBuf> {
    let local = LOCAL_CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file());

    local.or_else(|| {
        get_global_config_path()
            .ok()
            .filter(|path| path.is_file())
    })
}

/// Load config from a `.toml` or `.json` file.
///
/// Fields missing from the file keep their defaults.
pub fn load_config_from_file(path: &Path) -> Result<BootstrapConfig, ConfigError> {
    let format = validate_config_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(format!(
                "Configuration file not found at: {}",
                path.display()
            ))
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let config = match format {
        ConfigFormat::Toml => toml::from_str(&content)?,
        ConfigFormat::Json => serde_json::from_str(&content)?,
    };

    Ok(config)
}

/// Save config to a `.toml` or `.json` file.
pub fn save_config_to_file(config: &BootstrapConfig, path: &Path) -> Result<(), ConfigError> {
    let format = validate_config_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    };

    fs::write(path, content)?;
    Ok(())
}

/// Serialization format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

/// Validate config path (.toml or .json extension required).
pub fn validate_config_path(path: &Path) -> Result<ConfigFormat, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path cannot be empty".to_string(),
        ));
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(ConfigFormat::Toml),
        Some("json") => Ok(ConfigFormat::Json),
        Some(ext) => Err(ConfigError::ValidationFailed(format!(
            "Configuration file must have .toml or .json extension, got .{}",
            ext
        ))),
        None => Err(ConfigError::ValidationFailed(
            "Configuration file must have .toml or .json extension".to_string(),
        )),
    }
}
