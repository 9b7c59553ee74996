//! # Export Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  XlsxError / printpdf::Error / io::Error                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ExportError (this module) ← names the stage that failed               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ConsoleError (app) ← logged in full, shown as a generic notice        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Export failures. None of them leave a partial file behind.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Workbook construction or serialization failed.
    #[error("Spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// PDF construction or serialization failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// The output directory is missing or not a directory.
    #[error("Output directory not usable: {}", .0.display())]
    OutputDir(PathBuf),

    /// Writing the finished file failed.
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub(crate) fn pdf(err: impl std::fmt::Display) -> Self {
        ExportError::Pdf(err.to_string())
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
