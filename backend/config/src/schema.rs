//! vaultocr configuration schema.
//!
//! Typed for serde YAML deserialization. Every field has a default, so an
//! empty or missing file is a valid configuration apart from `vaultPath`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::*;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OcrConfig {
    /// Root of the document tree to process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_path: Option<PathBuf>,

    /// Extension of documents to process, without the dot.
    pub document_extension: String,

    /// Image extensions recognized in embed references.
    pub image_extensions: Vec<String>,

    /// Name of the folder attachments are stored under.
    pub attachment_folder: String,

    /// Suffix of per-document auto-generated resource folders.
    pub resource_marker: String,

    /// Front-matter key holding recognized text; also the idempotency marker.
    pub field_name: String,

    /// Re-process documents that already carry the field.
    pub overwrite: bool,

    /// Language hint in tesseract syntax (`eng+est`).
    pub languages: String,

    /// Documents processed at once.
    pub document_concurrency: usize,

    /// Attachments recognized at once within one document.
    pub attachment_concurrency: usize,

    /// Per-call recognition limit in seconds; 0 disables it.
    pub recognition_timeout_secs: u64,

    pub engine: EngineConfig,

    pub logging: LoggingConfig,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            vault_path: None,
            document_extension: DEFAULT_DOCUMENT_EXTENSION.to_string(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            attachment_folder: DEFAULT_ATTACHMENT_FOLDER.to_string(),
            resource_marker: DEFAULT_RESOURCE_MARKER.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            overwrite: false,
            languages: DEFAULT_LANGUAGES.to_string(),
            document_concurrency: DEFAULT_DOCUMENT_CONCURRENCY,
            attachment_concurrency: DEFAULT_ATTACHMENT_CONCURRENCY,
            recognition_timeout_secs: DEFAULT_RECOGNITION_TIMEOUT_SECS,
            engine: EngineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl OcrConfig {
    pub fn recognition_timeout(&self) -> Option<Duration> {
        (self.recognition_timeout_secs > 0).then(|| Duration::from_secs(self.recognition_timeout_secs))
    }
}

// ---------------------------------------------------------------------------
// Recognition engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EngineConfig {
    /// Local `tesseract` CLI.
    #[serde(rename = "tesseract")]
    Tesseract {
        #[serde(default = "default_tesseract_binary")]
        binary: String,
    },
    /// OpenAI-compatible vision model.
    #[serde(rename = "openai")]
    OpenAi {
        #[serde(rename = "apiKey", default)]
        api_key: String,
        #[serde(default = "default_vision_model")]
        model: String,
        #[serde(rename = "baseUrl", default = "default_vision_base_url")]
        base_url: String,
    },
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::Tesseract { binary: default_tesseract_binary() }
    }
}

fn default_tesseract_binary() -> String {
    DEFAULT_TESSERACT_BINARY.to_string()
}

fn default_vision_model() -> String {
    DEFAULT_VISION_MODEL.to_string()
}

fn default_vision_base_url() -> String {
    DEFAULT_VISION_BASE_URL.to_string()
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines on the console.
    pub json: bool,
    /// Directory for daily-rotated NDJSON log files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false, dir: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        let cfg: OcrConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, OcrConfig::default());
        assert_eq!(cfg.document_concurrency, 5);
        assert_eq!(cfg.attachment_concurrency, 5);
        assert_eq!(cfg.field_name, "OCR");
    }

    #[test]
    fn parses_camel_case_fields() {
        let yaml = "vaultPath: /notes\nattachmentFolder: \"📎 manused\"\nlanguages: eng+est\noverwrite: true\n";
        let cfg: OcrConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.vault_path, Some(PathBuf::from("/notes")));
        assert_eq!(cfg.attachment_folder, "📎 manused");
        assert_eq!(cfg.languages, "eng+est");
        assert!(cfg.overwrite);
        assert_eq!(cfg.image_extensions.len(), 7);
    }

    #[test]
    fn parses_openai_engine_with_defaults() {
        let yaml = "engine:\n  kind: openai\n  apiKey: sk-test\n";
        let cfg: OcrConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            cfg.engine,
            EngineConfig::OpenAi {
                api_key: "sk-test".into(),
                model: DEFAULT_VISION_MODEL.into(),
                base_url: DEFAULT_VISION_BASE_URL.into(),
            }
        );
    }

    #[test]
    fn zero_timeout_disables_limit() {
        let cfg = OcrConfig { recognition_timeout_secs: 0, ..Default::default() };
        assert!(cfg.recognition_timeout().is_none());
        assert_eq!(OcrConfig::default().recognition_timeout(), Some(Duration::from_secs(120)));
    }
}
