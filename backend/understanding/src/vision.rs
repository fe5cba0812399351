/// Vision-model recognition: transcribe image text through an
/// OpenAI-compatible chat completions endpoint.
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use media::{detect_mime_type, is_image};
use tracing::debug;
use vaultocr_core::{RecognitionError, Recognizer};

const ENGINE: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct VisionRecognizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl VisionRecognizer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn engine_error(message: impl Into<String>) -> RecognitionError {
        RecognitionError::Engine { engine: ENGINE.to_string(), message: message.into() }
    }
}

fn transcription_prompt(languages: &str) -> String {
    let mut prompt = String::from(
        "Transcribe all text visible in this image exactly as written. \
         Reply with the transcribed text only. If there is no text, reply with nothing.",
    );
    if !languages.is_empty() {
        prompt.push_str(&format!(" Expected languages (tesseract codes): {languages}."));
    }
    prompt
}

#[async_trait]
impl Recognizer for VisionRecognizer {
    fn name(&self) -> &str {
        ENGINE
    }

    async fn recognize(&self, image: &Path, languages: &str) -> Result<String, RecognitionError> {
        let mime_type = detect_mime_type(image);
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|e| RecognitionError::from_io(image, e))?;
        if !is_image(mime_type) {
            return Err(Self::engine_error(format!(
                "unsupported image type for {}",
                image.display()
            )));
        }

        debug!(model = %self.model, image = %image.display(), bytes = bytes.len(), "Transcribing via vision model");
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": transcription_prompt(languages) },
                    { "type": "image_url",
                      "image_url": { "url": format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes)) } }
                ]
            }],
            "temperature": 0
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::engine_error(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(Self::engine_error(format!(
                "{status}: {}",
                resp.text().await.unwrap_or_default()
            )));
        }
        let json: serde_json::Value =
            resp.json().await.map_err(|e| Self::engine_error(e.to_string()))?;
        Ok(json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_image_is_not_found() {
        let err = VisionRecognizer::new("key")
            .recognize(Path::new("/definitely/not/here.png"), "eng")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn rejects_non_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.xyz");
        std::fs::write(&file, b"plain").unwrap();

        let err = VisionRecognizer::new("key").recognize(&file, "eng").await.unwrap_err();
        assert!(matches!(err, RecognitionError::Engine { .. }));
    }

    #[test]
    fn prompt_mentions_languages_when_given() {
        assert!(transcription_prompt("eng+est").contains("eng+est"));
        assert!(!transcription_prompt("").contains("Expected languages"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let r = VisionRecognizer::new("k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(r.base_url, "http://localhost:8080/v1");
    }
}
