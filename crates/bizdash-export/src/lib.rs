//! # bizdash-export: Document Generation for Bizdash
//!
//! Converts in-memory invoice collections into downloadable files.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bizdash Export Flow                              │
//! │                                                                         │
//! │  console: export spreadsheet | report | invoice                         │
//! │       │  filtered invoices (bizdash-core)                               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 bizdash-export (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌───────────────┐  ┌──────────────────┐   │   │
//! │  │   │ spreadsheet   │  │  pdf::report  │  │  pdf::invoice    │   │   │
//! │  │   │ invoices.xlsx │  │ invoices.pdf  │  │ <invoiceNo>.pdf  │   │   │
//! │  │   └───────┬───────┘  └───────┬───────┘  └────────┬─────────┘   │   │
//! │  │           └──────────────────┼───────────────────┘             │   │
//! │  │                              ▼                                  │   │
//! │  │                      ExportArtifact (bytes)                     │   │
//! │  └──────────────────────────────┬──────────────────────────────────┘   │
//! │                                 ▼                                       │
//! │               write_to(dir): temp file + rename                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Generation is synchronous and CPU-bound. Nothing touches the disk until
//! [`ExportArtifact::write_to`].

// =============================================================================
// Module Declarations
// =============================================================================

pub mod artifact;
pub mod error;
pub mod pdf;
pub mod spreadsheet;

// =============================================================================
// Re-exports
// =============================================================================

pub use artifact::{safe_file_name, ExportArtifact};
pub use error::{ExportError, ExportResult};
pub use pdf::invoice::export_single_invoice_to_pdf;
pub use pdf::report::{export_to_pdf_report, export_to_pdf_report_at};
pub use spreadsheet::export_to_spreadsheet;
