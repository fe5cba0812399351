//! MIME type detection for image attachments.
//!
//! Used to label image bytes sent to remote recognition engines.

use std::path::Path;

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Detect an image MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    match lowercase_extension(path).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "bmp"          => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "heic"         => "image/heic",
        "avif"         => "image/avif",
        _              => "application/octet-stream",
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_mime_type(&PathBuf::from("photo.JPG")), "image/jpeg");
    }

    #[test]
    fn detects_tiff_variants() {
        assert_eq!(detect_mime_type(&PathBuf::from("scan.tif")), "image/tiff");
        assert_eq!(detect_mime_type(&PathBuf::from("scan.tiff")), "image/tiff");
    }

    #[test]
    fn unknown_extension_fallback() {
        let mime = detect_mime_type(&PathBuf::from("file.xyz"));
        assert_eq!(mime, "application/octet-stream");
        assert!(!is_image(mime));
    }
}
