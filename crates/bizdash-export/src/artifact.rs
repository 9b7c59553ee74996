//! Finished export files and the all-or-nothing write to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{ExportError, ExportResult};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A generated file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    /// Data rows written: invoices for collection exports, line items for a
    /// single invoice.
    pub row_count: usize,
}

impl ExportArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes the file into `dir` and returns its path.
    ///
    /// Bytes go to a temporary file in the same directory first and are
    /// renamed into place, so a failure never leaves a truncated export. An
    /// existing file with the same name is replaced.
    pub fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        if !dir.is_dir() {
            return Err(ExportError::OutputDir(dir.to_path_buf()));
        }

        let target = dir.join(&self.file_name);
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&self.bytes)?;
        tmp.flush()?;
        debug!(tmp = %tmp.path().display(), "Export staged");

        tmp.persist(&target).map_err(|err| ExportError::Io(err.error))?;

        info!(
            path = %target.display(),
            bytes = self.bytes.len(),
            rows = self.row_count,
            "Export written"
        );
        Ok(target)
    }
}

/// Turns an invoice number into a file name: path separators and other
/// characters file systems reject become `-`.
pub fn safe_file_name(stem: &str, extension: &str) -> String {
    let cleaned: String = stem
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim_matches('.');
    let stem = if cleaned.is_empty() { "invoice" } else { cleaned };
    format!("{stem}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str, bytes: &[u8]) -> ExportArtifact {
        ExportArtifact {
            file_name: name.to_string(),
            content_type: PDF_CONTENT_TYPE,
            bytes: bytes.to_vec(),
            row_count: 0,
        }
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("INV-2025-002", "pdf"), "INV-2025-002.pdf");
        assert_eq!(safe_file_name("GST/24-25/17", "pdf"), "GST-24-25-17.pdf");
        assert_eq!(safe_file_name("a\\b:c", "pdf"), "a-b-c.pdf");
        assert_eq!(safe_file_name("  ", "pdf"), "invoice.pdf");
        assert_eq!(safe_file_name("..", "pdf"), "invoice.pdf");
    }

    #[test]
    fn test_write_to_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact("out.pdf", b"%PDF-1.3").write_to(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("out.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3");
        // no stray temp files
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_to_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        artifact("out.pdf", b"old").write_to(dir.path()).unwrap();
        let path = artifact("out.pdf", b"new").write_to(dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn test_write_to_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = artifact("out.pdf", b"x").write_to(&missing).unwrap_err();
        assert!(matches!(err, ExportError::OutputDir(_)));
        assert!(!missing.exists());
    }
}
