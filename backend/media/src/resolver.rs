//! Attachment resolution: map an embed reference to a file path.
//!
//! Two storage conventions exist and nothing but the reference string tells
//! them apart:
//!
//! - **Default resource folder.** The authoring tool stores attachments in
//!   `<note dir>/<attachment folder>/<note stem, spaces as _><marker>/`.
//!   References using this convention never mention the attachment folder.
//! - **Explicit folder.** The reference already names the attachment folder,
//!   usually together with directories the note itself lives in. Reference
//!   segments that also appear in the note's path are dropped so they are not
//!   doubled when joined under the note's directory. Segments are compared
//!   after NFD normalization because typed names and filesystem names often
//!   disagree on composed vs. decomposed accents.
//!
//! Resolution is a guess; existence is only checked when the file is opened.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    DefaultResource,
    ExplicitFolder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub reference: String,
    pub path: PathBuf,
    pub provenance: Provenance,
}

#[derive(Debug, Clone)]
pub struct AttachmentResolver {
    attachment_folder: String,
    resource_marker: String,
}

fn nfd(s: &str) -> String {
    s.nfd().collect()
}

fn normal_segments(path: &Path) -> impl Iterator<Item = String> + '_ {
    path.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
    })
}

impl AttachmentResolver {
    pub fn new(attachment_folder: impl Into<String>, resource_marker: impl Into<String>) -> Self {
        Self {
            attachment_folder: attachment_folder.into(),
            resource_marker: resource_marker.into(),
        }
    }

    pub fn resource_marker(&self) -> &str {
        &self.resource_marker
    }

    /// Resolve `reference`, found in the document at `document`.
    pub fn resolve(&self, document: &Path, reference: &str) -> ResolvedAttachment {
        let doc_dir = document.parent().unwrap_or_else(|| Path::new(""));

        let (path, provenance) = if reference.contains(&self.attachment_folder) {
            (self.explicit_folder_path(document, doc_dir, reference), Provenance::ExplicitFolder)
        } else {
            (self.default_resource_path(document, doc_dir, reference), Provenance::DefaultResource)
        };

        debug!(
            document = %document.display(),
            reference,
            resolved = %path.display(),
            ?provenance,
            "Resolved attachment"
        );
        ResolvedAttachment { reference: reference.to_string(), path, provenance }
    }

    fn default_resource_path(&self, document: &Path, doc_dir: &Path, reference: &str) -> PathBuf {
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().replace(' ', "_"))
            .unwrap_or_default();
        let file_name = reference.rsplit('/').next().unwrap_or(reference);

        doc_dir
            .join(&self.attachment_folder)
            .join(format!("{stem}{}", self.resource_marker))
            .join(file_name)
    }

    fn explicit_folder_path(&self, document: &Path, doc_dir: &Path, reference: &str) -> PathBuf {
        let shared: HashSet<String> = normal_segments(document).map(|s| nfd(&s)).collect();

        reference
            .split('/')
            .filter(|segment| !segment.is_empty() && !shared.contains(&nfd(segment)))
            .fold(doc_dir.to_path_buf(), |path, segment| path.join(segment))
    }

    /// Drop every path segment containing the resource marker.
    ///
    /// Returns `None` when no segment carries the marker, i.e. there is
    /// nothing to correct.
    pub fn strip_resource_segments(&self, path: &Path) -> Option<PathBuf> {
        let mut stripped = PathBuf::new();
        let mut dropped = false;
        for component in path.components() {
            match component {
                Component::Normal(s) if s.to_string_lossy().contains(&self.resource_marker) => {
                    dropped = true;
                }
                other => stripped.push(other.as_os_str()),
            }
        }
        dropped.then_some(stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AttachmentResolver {
        AttachmentResolver::new("Attachments", ".resources")
    }

    #[test]
    fn default_resource_folder() {
        let r = resolver().resolve(Path::new("Notes/Trip.md"), "Trip.resources/photo.png");
        assert_eq!(r.provenance, Provenance::DefaultResource);
        assert_eq!(r.path, PathBuf::from("Notes/Attachments/Trip.resources/photo.png"));
    }

    #[test]
    fn default_resource_folder_uses_underscores_for_spaces() {
        let r = resolver().resolve(Path::new("/vault/Notes/Road Trip 2.md"), "image 1.png");
        assert_eq!(
            r.path,
            PathBuf::from("/vault/Notes/Attachments/Road_Trip_2.resources/image 1.png")
        );
    }

    #[test]
    fn explicit_folder_keeps_unshared_segments() {
        let r = resolver().resolve(Path::new("Notes/Trip.md"), "Attachments/Trip/photo.png");
        assert_eq!(r.provenance, Provenance::ExplicitFolder);
        assert_eq!(r.path, PathBuf::from("Notes/Attachments/Trip/photo.png"));
    }

    #[test]
    fn explicit_folder_drops_shared_segments() {
        let r = resolver().resolve(
            Path::new("/vault/Notes/Trip.md"),
            "Notes/Attachments/Trip.md/photo.png",
        );
        assert_eq!(r.path, PathBuf::from("/vault/Notes/Attachments/photo.png"));
    }

    #[test]
    fn explicit_folder_compares_under_nfd() {
        // Document path uses precomposed "ä", reference the decomposed form.
        let document = Path::new("/vault/M\u{e4}rkmed/Trip.md");
        let reference = "Ma\u{308}rkmed/Attachments/photo.png";
        let r = resolver().resolve(document, reference);
        assert_eq!(r.path, PathBuf::from("/vault/M\u{e4}rkmed/Attachments/photo.png"));
    }

    #[test]
    fn attachment_folder_match_is_substring() {
        let r = resolver().resolve(Path::new("a/n.md"), "Old Attachments/x.png");
        assert_eq!(r.provenance, Provenance::ExplicitFolder);
        assert_eq!(r.path, PathBuf::from("a/Old Attachments/x.png"));
    }

    #[test]
    fn strips_resource_segments() {
        let stripped = resolver()
            .strip_resource_segments(Path::new("/v/Notes/Attachments/Trip.resources/photo.png"))
            .unwrap();
        assert_eq!(stripped, PathBuf::from("/v/Notes/Attachments/photo.png"));
    }

    #[test]
    fn strip_without_marker_is_none() {
        assert!(resolver()
            .strip_resource_segments(Path::new("/v/Attachments/photo.png"))
            .is_none());
    }
}
