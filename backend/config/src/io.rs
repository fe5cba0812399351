//! Config file loading.

use crate::env::resolve_env_vars;
use crate::schema::OcrConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the vaultocr config directory.
/// Priority: `VAULTOCR_CONFIG_DIR` env > `~/.vaultocr/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VAULTOCR_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".vaultocr"),
        None => PathBuf::from(".vaultocr"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk, substituting `${VAR}` references.
///
/// Returns `Ok(Default::default())` if the file doesn't exist or is empty.
pub async fn load_config(path: &Path) -> Result<OcrConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(OcrConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: serde_yaml::Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;
    if value.is_null() {
        return Ok(OcrConfig::default());
    }

    let value = resolve_env_vars(&value)
        .with_context(|| format!("Failed to resolve env vars in: {}", path.display()))?;
    let config: OcrConfig = serde_yaml::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
