use std::path::Path;

use async_trait::async_trait;

use crate::error::RecognitionError;

/// Text recognition engine used by the attachment pipeline.
///
/// Implementations must tolerate concurrent calls up to the attachment pool width.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Engine name for logs (e.g., "tesseract", "openai").
    fn name(&self) -> &str;

    /// Recognize the text in the image at `image`.
    ///
    /// `languages` is a language hint in tesseract syntax (`eng+est`).
    /// A missing image must be reported as [`RecognitionError::NotFound`].
    async fn recognize(&self, image: &Path, languages: &str) -> Result<String, RecognitionError>;
}
