pub mod adapter;
pub mod clean;
pub mod tesseract;
pub mod vision;

pub use adapter::{Attempt, RecognitionAdapter};
pub use clean::clean_recognized_text;
pub use tesseract::TesseractRecognizer;
pub use vision::VisionRecognizer;
