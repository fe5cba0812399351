//! Config validation with user-friendly error messages.

use crate::defaults::MAX_SENSIBLE_CONCURRENCY;
use crate::schema::{EngineConfig, OcrConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &OcrConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_documents(config, &mut report);
    validate_references(config, &mut report);
    validate_pools(config, &mut report);
    validate_engine(config, &mut report);
    report
}

fn validate_documents(config: &OcrConfig, report: &mut ValidationReport) {
    let ext = config.document_extension.trim();
    if ext.is_empty() {
        report.error("documentExtension", "Document extension cannot be empty");
    } else if ext.starts_with('.') {
        report.warn("documentExtension", "Leading dot is ignored");
    }
    if config.field_name.trim().is_empty() {
        report.error("fieldName", "Field name cannot be empty");
    } else if config.field_name.contains(':') || config.field_name.contains('\n') {
        report.error("fieldName", "Field name cannot contain ':' or newlines");
    }
}

fn validate_references(config: &OcrConfig, report: &mut ValidationReport) {
    if config.image_extensions.is_empty() {
        report.error("imageExtensions", "At least one image extension is required");
    }
    for (i, ext) in config.image_extensions.iter().enumerate() {
        if !ext.starts_with('.') || ext.len() < 2 {
            report.error(
                format!("imageExtensions[{i}]"),
                format!("Extension '{ext}' must start with '.' and name a type"),
            );
        }
    }
    if config.attachment_folder.trim().is_empty() {
        report.error("attachmentFolder", "Attachment folder cannot be empty");
    }
    if config.resource_marker.is_empty() {
        report.error("resourceMarker", "Resource marker cannot be empty");
    }
}

fn validate_pools(config: &OcrConfig, report: &mut ValidationReport) {
    for (path, width) in [
        ("documentConcurrency", config.document_concurrency),
        ("attachmentConcurrency", config.attachment_concurrency),
    ] {
        if width == 0 {
            report.error(path, "Concurrency must be at least 1");
        } else if width > MAX_SENSIBLE_CONCURRENCY {
            report.warn(path, format!("{width} workers is unusually high"));
        }
    }
}

fn validate_engine(config: &OcrConfig, report: &mut ValidationReport) {
    match &config.engine {
        EngineConfig::Tesseract { binary } => {
            if binary.trim().is_empty() {
                report.error("engine.binary", "Tesseract binary cannot be empty");
            }
        }
        EngineConfig::OpenAi { api_key, model, .. } => {
            if api_key.trim().is_empty() {
                report.warn("engine.apiKey", "No API key set; recognition calls will be rejected");
            }
            if model.trim().is_empty() {
                report.error("engine.model", "Model cannot be empty");
            }
        }
    }
}
