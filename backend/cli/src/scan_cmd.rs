//! `vaultocr scan`: show where each reference resolves without recognizing anything.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use vaultocr_config::OcrConfig;
use vaultocr_core::Recognizer;
use vaultocr_executor::{discover_documents, Executor};

use crate::terminal_output::{note_info, note_warn, paint, render_table, Column, GREEN, RED};

pub async fn run(config: &OcrConfig, recognizer: Arc<dyn Recognizer>, vault: &Path, json: bool) -> Result<()> {
    let executor = Executor::from_config(config, recognizer)?;
    let root = vault.to_path_buf();
    let extension = config.document_extension.clone();
    let documents = tokio::task::spawn_blocking(move || discover_documents(&root, &extension))
        .await
        .context("Document discovery task failed")?;

    let mut rows = Vec::new();
    let mut entries = Vec::new();
    for document in &documents {
        let resolved = match executor.pipeline().scan(document).await {
            Ok(resolved) => resolved,
            Err(e) => {
                note_warn(&e.to_string());
                continue;
            }
        };
        for attachment in resolved {
            let exists = attachment.path.exists();
            let shown = document.strip_prefix(vault).unwrap_or(document);
            entries.push(json!({
                "document": document,
                "reference": &attachment.reference,
                "path": &attachment.path,
                "provenance": format!("{:?}", attachment.provenance),
                "exists": exists,
            }));
            rows.push(vec![
                shown.display().to_string(),
                attachment.reference,
                attachment.path.display().to_string(),
                if exists { paint(GREEN, "yes") } else { paint(RED, "no") },
            ]);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let columns = [
        Column::left("Document"),
        Column::left("Reference"),
        Column::left("Resolved path").max_width(80),
        Column::left("Exists"),
    ];
    print!("{}", render_table(&columns, &rows));
    note_info(&format!("{} reference(s) in {} document(s)", rows.len(), documents.len()));
    Ok(())
}
