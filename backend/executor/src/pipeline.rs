//! Per-document processing: extract → resolve and recognize (inner pool) → merge.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use markdown::{merge_field, ReferenceExtractor};
use media::{AttachmentResolver, ResolvedAttachment};
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use vaultocr_config::OcrConfig;
use vaultocr_core::{
    AttachmentOutcome, DocumentError, DocumentOutcome, DocumentReport, Recognizer, Shutdown,
};
use vaultocr_understanding::RecognitionAdapter;

use crate::write::write_atomic;

pub struct Pipeline {
    extractor: ReferenceExtractor,
    adapter: RecognitionAdapter,
    field_name: String,
    overwrite: bool,
    attachment_concurrency: usize,
}

impl Pipeline {
    pub fn new(
        extractor: ReferenceExtractor,
        adapter: RecognitionAdapter,
        field_name: impl Into<String>,
        overwrite: bool,
        attachment_concurrency: usize,
    ) -> Self {
        Self {
            extractor,
            adapter,
            field_name: field_name.into(),
            overwrite,
            attachment_concurrency: attachment_concurrency.max(1),
        }
    }

    pub fn from_config(config: &OcrConfig, recognizer: Arc<dyn Recognizer>) -> Result<Self> {
        let extractor = ReferenceExtractor::new(&config.image_extensions, &config.field_name)
            .context("Failed to build reference pattern from imageExtensions")?;
        let resolver = AttachmentResolver::new(&config.attachment_folder, &config.resource_marker);
        let adapter = RecognitionAdapter::new(recognizer, resolver, &config.languages)
            .with_timeout(config.recognition_timeout());
        Ok(Self::new(
            extractor,
            adapter,
            &config.field_name,
            config.overwrite,
            config.attachment_concurrency,
        ))
    }

    /// Extract and resolve a document's references without recognizing or writing.
    pub async fn scan(&self, path: &Path) -> Result<Vec<ResolvedAttachment>, DocumentError> {
        let text = read_document(path).await?;
        Ok(self
            .extractor
            .extract(&text, self.overwrite)
            .iter()
            .map(|reference| self.adapter.resolver().resolve(path, reference))
            .collect())
    }

    /// Process one document end to end. Failures are folded into the report.
    pub async fn process_document(self: &Arc<Self>, path: &Path, shutdown: &Shutdown) -> DocumentReport {
        match self.try_process(path, shutdown).await {
            Ok(report) => report,
            Err(DocumentError::Cancelled) => {
                debug!(path = %path.display(), "Document skipped after shutdown");
                DocumentReport::new(path, DocumentOutcome::Cancelled)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Document processing failed");
                DocumentReport::new(path, DocumentOutcome::Failed { error: e.to_string() })
            }
        }
    }

    async fn try_process(
        self: &Arc<Self>,
        path: &Path,
        shutdown: &Shutdown,
    ) -> Result<DocumentReport, DocumentError> {
        if shutdown.is_triggered() {
            return Err(DocumentError::Cancelled);
        }

        let text = read_document(path).await?;
        let references = self.extractor.extract(&text, self.overwrite);
        if references.is_empty() {
            debug!(path = %path.display(), "No references to recognize");
            return Ok(DocumentReport::new(path, DocumentOutcome::Skipped));
        }

        let attachments = self.recognize_all(path, references, shutdown).await;

        // Join barrier passed. Never write a document with cancelled attachments.
        if shutdown.is_triggered() {
            return Ok(DocumentReport {
                path: path.to_path_buf(),
                outcome: DocumentOutcome::Cancelled,
                attachments,
            });
        }

        let aggregated = aggregate(&attachments);
        let outcome = if aggregated.is_empty() {
            DocumentOutcome::Unchanged
        } else {
            // Re-read so edits made while recognition ran are not clobbered.
            let current = read_document(path).await?;
            match merge_field(&current, &self.field_name, &aggregated) {
                Some(merged) if merged != current => {
                    write_atomic(path, &merged)
                        .await
                        .map_err(|source| DocumentError::Write { path: path.to_path_buf(), source })?;
                    DocumentOutcome::Updated
                }
                _ => DocumentOutcome::Unchanged,
            }
        };

        info!(
            path = %path.display(),
            attachments = attachments.len(),
            recognized = attachments.iter().filter(|a| a.is_recognized()).count(),
            ?outcome,
            "Processed document"
        );
        Ok(DocumentReport { path: path.to_path_buf(), outcome, attachments })
    }

    /// Resolve and recognize every reference on a pool bounded by the
    /// attachment concurrency. Outcomes come back in reference order.
    async fn recognize_all(
        self: &Arc<Self>,
        document: &Path,
        references: Vec<String>,
        shutdown: &Shutdown,
    ) -> Vec<AttachmentOutcome> {
        let resolved: Vec<ResolvedAttachment> = references
            .iter()
            .map(|reference| self.adapter.resolver().resolve(document, reference))
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.attachment_concurrency));
        let mut tasks = JoinSet::new();
        for (index, attachment) in resolved.iter().cloned().enumerate() {
            let pipeline = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            let mut shutdown = shutdown.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome = pipeline.adapter.recognize_attachment(&attachment, &mut shutdown).await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<AttachmentOutcome>> = vec![None; resolved.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => error!(document = %document.display(), error = %e, "Attachment task panicked"),
            }
        }

        slots
            .into_iter()
            .zip(resolved)
            .map(|(slot, attachment)| {
                slot.unwrap_or(AttachmentOutcome {
                    reference: attachment.reference,
                    path: attachment.path,
                    text: None,
                })
            })
            .collect()
    }
}

async fn read_document(path: &Path) -> Result<String, DocumentError> {
    fs::read_to_string(path)
        .await
        .map_err(|source| DocumentError::Read { path: PathBuf::from(path), source })
}

/// Join the non-empty recognized texts with single spaces.
fn aggregate(attachments: &[AttachmentOutcome]) -> String {
    attachments
        .iter()
        .filter_map(|a| a.text.as_deref())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(text: Option<&str>) -> AttachmentOutcome {
        AttachmentOutcome {
            reference: "r.png".into(),
            path: PathBuf::from("r.png"),
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn aggregate_skips_failures_and_empty_texts() {
        let attachments =
            [outcome(Some("first")), outcome(None), outcome(Some("")), outcome(Some("second"))];
        assert_eq!(aggregate(&attachments), "first second");
    }

    #[test]
    fn aggregate_of_nothing_is_empty() {
        assert_eq!(aggregate(&[outcome(None)]), "");
    }
}
