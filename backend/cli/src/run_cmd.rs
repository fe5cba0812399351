//! `vaultocr run`: process the whole vault and print a summary.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use vaultocr_config::OcrConfig;
use vaultocr_core::{Recognizer, RunSummary, Shutdown};
use vaultocr_executor::Executor;

use crate::terminal_output::{note_error, note_success, note_warn, render_table, Column};

/// Returns whether any document failed.
pub async fn run(
    config: &OcrConfig,
    recognizer: Arc<dyn Recognizer>,
    vault: &Path,
    shutdown: &Shutdown,
    json: bool,
) -> Result<bool> {
    let executor = Executor::from_config(config, recognizer)?;
    let summary = executor.run_tree(vault, &config.document_extension, shutdown).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary_table(&summary));
        if summary.has_failures() {
            note_error(&format!("{} document(s) failed; see the log for details", summary.failed));
        } else if summary.cancelled > 0 {
            note_warn(&format!("Interrupted; {} document(s) left untouched", summary.cancelled));
        } else {
            note_success(&format!("Processed {} document(s)", summary.processed()));
        }
    }
    Ok(summary.has_failures())
}

fn summary_table(summary: &RunSummary) -> String {
    let rows: Vec<Vec<String>> = [
        ("Documents", summary.documents),
        ("Updated", summary.updated),
        ("Unchanged", summary.unchanged),
        ("Skipped", summary.skipped),
        ("Failed", summary.failed),
        ("Cancelled", summary.cancelled),
        ("Attachments recognized", summary.attachments_recognized),
        ("Attachments failed", summary.attachments_failed),
    ]
    .into_iter()
    .map(|(label, count)| vec![label.to_string(), count.to_string()])
    .collect();

    render_table(&[Column::left("Result"), Column::right("Count")], &rows)
}
