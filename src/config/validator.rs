//! Config validation.

use crate::error::ConfigError;
use crate::models::BootstrapConfig;
use std::path::Path;

/// Validate the whole configuration, reporting the first problem found.
pub fn validate_config(config: &BootstrapConfig) -> Result<(), ConfigError> {
    validate_program("toolchain.program", &config.toolchain.program)?;
    validate_program("toolchain.version_flag", &config.toolchain.version_flag)?;
    validate_required_version(&config.toolchain.required_version)?;

    validate_program("submodules.program", &config.submodules.program)?;

    validate_program("dependency.configure_program", &config.dependency.configure_program)?;
    validate_program("dependency.build_program", &config.dependency.build_program)?;
    validate_step_directory("dependency.directory", &config.dependency.directory)?;

    validate_program("smoke.build_tool", &config.smoke.build_tool)?;
    validate_step_directory("smoke.directory", &config.smoke.directory)?;
    if config.smoke.target.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "smoke.target cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate the version marker the toolchain output must contain.
pub fn validate_required_version(marker: &str) -> Result<(), ConfigError> {
    // An empty marker is contained in every string and would disable the gate.
    if marker.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "toolchain.required_version cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate a program name or single-token argument.
pub fn validate_program(field: &str, program: &str) -> Result<(), ConfigError> {
    if program.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}

/// Step directories are entered relative to the tree the bootstrap runs in.
pub fn validate_step_directory(field: &str, dir: &Path) -> Result<(), ConfigError> {
    if dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(format!(
            "{} cannot be empty",
            field
        )));
    }

    if dir.is_absolute() {
        return Err(ConfigError::ValidationFailed(format!(
            "{} must be relative to the source tree, got: {}",
            field,
            dir.display()
        )));
    }

    Ok(())
}
