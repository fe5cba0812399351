use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

fn temp_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.vaultocr-tmp"))
}

/// Replace `path` with `contents` via a sibling temp file and rename,
/// so readers never observe a half-written document.
pub async fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let tmp = temp_path(path);
    fs::write(&tmp, contents).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replaces_contents_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Note.md");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert!(!temp_path(&path).exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent/Note.md");
        assert!(write_atomic(&path, "x").await.is_err());
    }
}
