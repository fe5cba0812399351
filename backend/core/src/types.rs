use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Result of resolving and recognizing one reference.
///
/// `text` is `None` when recognition failed; the failure itself has
/// already been logged by the time an outcome exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentOutcome {
    pub reference: String,
    /// Last path recognition was attempted on.
    pub path: PathBuf,
    pub text: Option<String>,
}

impl AttachmentOutcome {
    pub fn is_recognized(&self) -> bool {
        self.text.is_some()
    }
}

/// What happened to one document in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum DocumentOutcome {
    /// The metadata block was written.
    Updated,
    /// References were found but nothing was recognized.
    Unchanged,
    /// No references, or already annotated and overwrite is off.
    Skipped,
    /// Read or write failed.
    Failed { error: String },
    /// Shutdown was requested before the document could be finished.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    pub path: PathBuf,
    pub outcome: DocumentOutcome,
    pub attachments: Vec<AttachmentOutcome>,
}

impl DocumentReport {
    pub fn new(path: impl Into<PathBuf>, outcome: DocumentOutcome) -> Self {
        Self { path: path.into(), outcome, attachments: Vec::new() }
    }
}

/// Aggregate counts for a whole-tree run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub documents: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub attachments_recognized: usize,
    pub attachments_failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &DocumentReport) {
        self.documents += 1;
        match report.outcome {
            DocumentOutcome::Updated => self.updated += 1,
            DocumentOutcome::Unchanged => self.unchanged += 1,
            DocumentOutcome::Skipped => self.skipped += 1,
            DocumentOutcome::Failed { .. } => self.failed += 1,
            DocumentOutcome::Cancelled => self.cancelled += 1,
        }
        let recognized = report.attachments.iter().filter(|a| a.is_recognized()).count();
        self.attachments_recognized += recognized;
        self.attachments_failed += report.attachments.len() - recognized;
    }

    /// Documents that went through the pipeline without failing or being cancelled.
    pub fn processed(&self) -> usize {
        self.updated + self.unchanged + self.skipped
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
