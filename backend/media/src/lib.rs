pub mod mime_detect;
pub mod resolver;

pub use mime_detect::{detect_mime_type, is_image};
pub use resolver::{AttachmentResolver, Provenance, ResolvedAttachment};
