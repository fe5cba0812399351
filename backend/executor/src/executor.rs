use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};
use vaultocr_config::OcrConfig;
use vaultocr_core::{DocumentOutcome, DocumentReport, Recognizer, RunSummary, Shutdown};

use crate::discover::discover_documents;
use crate::pipeline::Pipeline;

/// Drives the pipeline across many documents on a pool bounded by the
/// document concurrency. Each document additionally fans out to its own
/// attachment pool inside [`Pipeline`].
pub struct Executor {
    pipeline: Arc<Pipeline>,
    document_concurrency: usize,
}

impl Executor {
    pub fn new(pipeline: Pipeline, document_concurrency: usize) -> Self {
        Self { pipeline: Arc::new(pipeline), document_concurrency: document_concurrency.max(1) }
    }

    pub fn from_config(config: &OcrConfig, recognizer: Arc<dyn Recognizer>) -> Result<Self> {
        let pipeline = Pipeline::from_config(config, recognizer)?;
        Ok(Self::new(pipeline, config.document_concurrency))
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Discover every document under `root` and process them all.
    pub async fn run_tree(&self, root: &Path, extension: &str, shutdown: &Shutdown) -> Result<RunSummary> {
        let root_buf = root.to_path_buf();
        let extension = extension.to_string();
        let documents = tokio::task::spawn_blocking(move || discover_documents(&root_buf, &extension))
            .await
            .context("Document discovery task failed")?;

        info!(root = %root.display(), documents = documents.len(), "Starting run");
        Ok(self.run(documents, shutdown).await)
    }

    /// Process `documents`; never fails as a whole. Per-document failures
    /// are counted in the summary.
    pub async fn run(&self, documents: Vec<PathBuf>, shutdown: &Shutdown) -> RunSummary {
        let total = documents.len();
        let semaphore = Arc::new(Semaphore::new(self.document_concurrency));
        let mut tasks = JoinSet::new();

        for path in documents {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&semaphore);
            let shutdown = shutdown.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                pipeline.process_document(&path, &shutdown).await
            });
        }

        let mut summary = RunSummary::default();
        while let Some(joined) = tasks.join_next().await {
            let report = match joined {
                Ok(report) => report,
                Err(e) => {
                    error!(error = %e, "Document task panicked");
                    DocumentReport::new(PathBuf::new(), DocumentOutcome::Failed { error: e.to_string() })
                }
            };
            summary.record(&report);
            info!(
                done = summary.documents,
                total,
                path = %report.path.display(),
                "Document finished"
            );
        }

        info!(
            documents = summary.documents,
            updated = summary.updated,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Run complete"
        );
        summary
    }
}
