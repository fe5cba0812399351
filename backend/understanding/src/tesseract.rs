//! Local recognition through the `tesseract` command-line tool.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use vaultocr_core::{RecognitionError, Recognizer};

const ENGINE: &str = "tesseract";

pub struct TesseractRecognizer {
    binary: String,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new(ENGINE)
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        ENGINE
    }

    async fn recognize(&self, image: &Path, languages: &str) -> Result<String, RecognitionError> {
        // tesseract reports a missing input only through stderr text.
        tokio::fs::metadata(image)
            .await
            .map_err(|e| RecognitionError::from_io(image, e))?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(image).arg("stdout");
        if !languages.is_empty() {
            cmd.arg("-l").arg(languages);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(binary = %self.binary, image = %image.display(), languages, "Running tesseract");
        let output = cmd.output().await.map_err(|e| RecognitionError::Engine {
            engine: ENGINE.to_string(),
            message: format!("failed to run {}: {e}", self.binary),
        })?;

        if !output.status.success() {
            return Err(RecognitionError::Engine {
                engine: ENGINE.to_string(),
                message: format!(
                    "exit {}: {}",
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
