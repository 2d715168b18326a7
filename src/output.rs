//! Persistence of rendered documents.
//!
//! Writes go through a temp file in the target directory followed by a
//! rename, so a failed run never leaves a truncated document behind.

use anyhow::{Context, Result};
use tracing::debug;

use crate::render::RenderedDocument;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically writes `contents` to `path`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());

    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path)
        .with_context(|| format!("failed to persist {}", path.display()))?;

    debug!(path = %path.display(), bytes = contents.len(), "Document written");
    Ok(())
}

/// Writes a rendered per-line document into `dir` under its derived
/// filename, returning the full path.
pub fn write_document(dir: &Path, doc: &RenderedDocument) -> Result<PathBuf> {
    let path = dir.join(&doc.filename);
    write_atomic(&path, &doc.markdown)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("proba.md");

        write_atomic(&path, "# Proba\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# Proba\n");
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("proba.md");

        write_atomic(&path, "staro\n").unwrap();
        write_atomic(&path, "novo\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "novo\n");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("proba.md");

        write_atomic(&path, "sadržaj\n").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_document_uses_derived_filename() {
        let dir = tempdir().unwrap();
        let doc = RenderedDocument {
            filename: "005_centar.md".to_string(),
            heading: "# Linija 5: Centar".to_string(),
            markdown: "# Linija 5: Centar\n".to_string(),
        };

        let path = write_document(dir.path(), &doc).unwrap();

        assert!(path.ends_with("005_centar.md"));
        assert!(path.exists());
    }
}
