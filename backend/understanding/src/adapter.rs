//! Recognition adapter: engine call, cleanup, timeout, and the single
//! corrected-path retry for resource-folder guesses.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use media::{AttachmentResolver, ResolvedAttachment};
use tracing::{debug, info, warn};
use vaultocr_core::{AttachmentOutcome, RecognitionError, Recognizer, Shutdown};

use crate::clean::clean_recognized_text;

/// Outcome of recognizing one path, including a possible retry.
#[derive(Debug)]
pub struct Attempt {
    /// Path of the last call made.
    pub path: PathBuf,
    /// Cleaned text on success.
    pub result: Result<String, RecognitionError>,
}

pub struct RecognitionAdapter {
    recognizer: Arc<dyn Recognizer>,
    resolver: AttachmentResolver,
    languages: String,
    timeout: Option<Duration>,
}

impl RecognitionAdapter {
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        resolver: AttachmentResolver,
        languages: impl Into<String>,
    ) -> Self {
        Self { recognizer, resolver, languages: languages.into(), timeout: None }
    }

    /// Bound every engine call by `timeout`. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn resolver(&self) -> &AttachmentResolver {
        &self.resolver
    }

    /// Recognize `path`, retrying once without resource-folder segments when
    /// the first guess does not exist.
    pub async fn recognize(&self, path: &Path, shutdown: &mut Shutdown) -> Attempt {
        let first = self.call(path, shutdown).await;
        let err = match first {
            Ok(raw) => {
                return Attempt { path: path.to_path_buf(), result: Ok(clean_recognized_text(&raw)) };
            }
            Err(err) => err,
        };

        let corrected = if err.is_not_found() {
            self.resolver.strip_resource_segments(path)
        } else {
            None
        };
        let Some(corrected) = corrected else {
            return Attempt { path: path.to_path_buf(), result: Err(err) };
        };

        debug!(
            original = %path.display(),
            corrected = %corrected.display(),
            "Image missing at resource-folder guess; retrying corrected path"
        );
        let result = self.call(&corrected, shutdown).await.map(|raw| clean_recognized_text(&raw));
        Attempt { path: corrected, result }
    }

    /// Recognize one resolved attachment, degrading any failure to an absent
    /// text after logging it.
    pub async fn recognize_attachment(
        &self,
        attachment: &ResolvedAttachment,
        shutdown: &mut Shutdown,
    ) -> AttachmentOutcome {
        let Attempt { path, result } = self.recognize(&attachment.path, shutdown).await;
        let text = match result {
            Ok(text) => {
                info!(path = %path.display(), chars = text.len(), "Recognized attachment");
                Some(text)
            }
            Err(RecognitionError::Cancelled) => {
                debug!(path = %path.display(), "Recognition cancelled");
                None
            }
            Err(e) => {
                warn!(
                    reference = %attachment.reference,
                    path = %path.display(),
                    engine = self.recognizer.name(),
                    error = %e,
                    "Recognition failed"
                );
                None
            }
        };
        AttachmentOutcome { reference: attachment.reference.clone(), path, text }
    }

    async fn call(&self, path: &Path, shutdown: &mut Shutdown) -> Result<String, RecognitionError> {
        let bounded = async {
            let call = self.recognizer.recognize(path, &self.languages);
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                    RecognitionError::Timeout { path: path.to_path_buf(), secs: limit.as_secs() }
                })?,
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = shutdown.triggered() => Err(RecognitionError::Cancelled),
            result = bounded => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use vaultocr_core::ShutdownHandle;

    /// Serves canned text for known paths; everything else is missing.
    #[derive(Default)]
    struct FakeRecognizer {
        images: HashMap<PathBuf, String>,
        broken: Vec<PathBuf>,
        calls: Mutex<Vec<PathBuf>>,
        delay: Option<Duration>,
    }

    impl FakeRecognizer {
        fn with_image(mut self, path: &str, text: &str) -> Self {
            self.images.insert(PathBuf::from(path), text.to_string());
            self
        }

        fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Recognizer for FakeRecognizer {
        fn name(&self) -> &str {
            "fake"
        }

        async fn recognize(&self, image: &Path, _languages: &str) -> Result<String, RecognitionError> {
            self.calls.lock().unwrap().push(image.to_path_buf());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.broken.iter().any(|p| p == image) {
                return Err(RecognitionError::Engine { engine: "fake".into(), message: "bad".into() });
            }
            self.images
                .get(image)
                .cloned()
                .ok_or_else(|| RecognitionError::NotFound { path: image.to_path_buf() })
        }
    }

    fn adapter(fake: Arc<FakeRecognizer>) -> RecognitionAdapter {
        RecognitionAdapter::new(fake, AttachmentResolver::new("Attachments", ".resources"), "eng")
    }

    #[tokio::test]
    async fn cleans_successful_output() {
        let fake = Arc::new(FakeRecognizer::default().with_image("/v/a.png", " \"hi\"\nthere "));
        let attempt = adapter(fake).recognize(Path::new("/v/a.png"), &mut Shutdown::never()).await;
        assert_eq!(attempt.result.unwrap(), "'hi' there");
    }

    #[tokio::test]
    async fn retries_once_without_resource_segment() {
        let fake = Arc::new(FakeRecognizer::default().with_image("/v/Attachments/a.png", "found"));
        let attempt = adapter(fake.clone())
            .recognize(Path::new("/v/Attachments/Note.resources/a.png"), &mut Shutdown::never())
            .await;

        assert_eq!(attempt.result.unwrap(), "found");
        assert_eq!(attempt.path, PathBuf::from("/v/Attachments/a.png"));
        assert_eq!(fake.calls().len(), 2);
    }

    #[tokio::test]
    async fn retry_is_bounded_to_one() {
        let fake = Arc::new(FakeRecognizer::default());
        let attempt = adapter(fake.clone())
            .recognize(Path::new("/v/A.resources/B.resources/a.png"), &mut Shutdown::never())
            .await;

        assert!(attempt.result.unwrap_err().is_not_found());
        assert_eq!(
            fake.calls(),
            vec![PathBuf::from("/v/A.resources/B.resources/a.png"), PathBuf::from("/v/a.png")]
        );
    }

    #[tokio::test]
    async fn no_retry_without_marker() {
        let fake = Arc::new(FakeRecognizer::default());
        let attempt = adapter(fake.clone())
            .recognize(Path::new("/v/Attachments/a.png"), &mut Shutdown::never())
            .await;
        assert!(attempt.result.is_err());
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn no_retry_for_engine_errors() {
        let mut fake = FakeRecognizer::default();
        fake.broken.push(PathBuf::from("/v/N.resources/a.png"));
        let fake = Arc::new(fake);
        let attempt = adapter(fake.clone())
            .recognize(Path::new("/v/N.resources/a.png"), &mut Shutdown::never())
            .await;
        assert!(matches!(attempt.result, Err(RecognitionError::Engine { .. })));
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn times_out_slow_engine() {
        let fake = FakeRecognizer {
            delay: Some(Duration::from_secs(5)),
            ..FakeRecognizer::default().with_image("/v/a.png", "late")
        };
        let adapter = adapter(Arc::new(fake)).with_timeout(Some(Duration::from_millis(20)));
        let attempt = adapter.recognize(Path::new("/v/a.png"), &mut Shutdown::never()).await;
        assert!(matches!(attempt.result, Err(RecognitionError::Timeout { .. })));
    }

    #[tokio::test]
    async fn shutdown_cancels_in_flight_call() {
        let fake = FakeRecognizer {
            delay: Some(Duration::from_secs(5)),
            ..FakeRecognizer::default().with_image("/v/a.png", "late")
        };
        let adapter = adapter(Arc::new(fake));
        let (handle, mut shutdown) = ShutdownHandle::new();
        handle.trigger();
        let attempt = adapter.recognize(Path::new("/v/a.png"), &mut shutdown).await;
        assert!(matches!(attempt.result, Err(RecognitionError::Cancelled)));
    }

    #[tokio::test]
    async fn failed_attachment_degrades_to_absent_text() {
        let fake = Arc::new(FakeRecognizer::default());
        let adapter = adapter(fake);
        let resolved = adapter.resolver().resolve(Path::new("/v/Note.md"), "missing.png");
        let outcome = adapter.recognize_attachment(&resolved, &mut Shutdown::never()).await;
        assert_eq!(outcome.reference, "missing.png");
        assert!(outcome.text.is_none());
        assert_eq!(outcome.path, PathBuf::from("/v/Attachments/missing.png"));
    }
}
