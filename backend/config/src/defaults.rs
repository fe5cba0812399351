//! Default values for every configuration option.

pub const DEFAULT_DOCUMENT_EXTENSION: &str = "md";
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] =
    &[".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff", ".tif"];
pub const DEFAULT_ATTACHMENT_FOLDER: &str = "Attachments";
pub const DEFAULT_RESOURCE_MARKER: &str = ".resources";
pub const DEFAULT_FIELD_NAME: &str = "OCR";
pub const DEFAULT_LANGUAGES: &str = "eng";
pub const DEFAULT_DOCUMENT_CONCURRENCY: usize = 5;
pub const DEFAULT_ATTACHMENT_CONCURRENCY: usize = 5;
pub const DEFAULT_RECOGNITION_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_VISION_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Pool widths above this are allowed but probably a mistake.
pub const MAX_SENSIBLE_CONCURRENCY: usize = 64;
