//! `vaultocr-config`: configuration for the vault OCR pipeline.
//!
//! Provides:
//! - Typed config schema with defaults for every option
//! - YAML loading from an explicit path or the config directory
//! - `${ENV_VAR}` substitution in string values
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::{EngineConfig, LoggingConfig, OcrConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load a config file, substitute env vars, and validate it.
///
/// Warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<OcrConfig> {
    let config = load_config(path).await?;
    check(&config)?;
    Ok(config)
}

/// Validate an already-assembled config (e.g. after CLI overrides).
pub fn check(config: &OcrConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!("{} configuration error(s); first: {}", report.errors.len(), report.errors[0]);
    }
    Ok(())
}
