//! # bizdash-core: Pure Invoice Logic for Bizdash
//!
//! The invoice core of the Bizdash admin dashboard: totals, the display
//! projection, the filter/paginate engine, wire-shape coercion, the draft
//! builder and the owned invoice store. No I/O happens in this crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bizdash Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/console (CLI front)                     │   │
//! │  │      list ──► show ──► export ──► delete ──► token              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bizdash-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │ totals  │ │ display │ │ filter  │ │  store  │  │   │
//! │  │   │ Invoice │ │  GST    │ │ labels  │ │  pages  │ │ actions │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐                          │   │
//! │  │   │  money  │ │ ingest  │ │  draft  │                          │   │
//! │  │   │  paise  │ │  JSON   │ │validate │                          │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘                          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                 │                     │
//! │  ┌──────────────▼──────────────┐   ┌──────────────▼──────────────┐     │
//! │  │  bizdash-export             │   │  bizdash-client             │     │
//! │  │  .xlsx, report & invoice PDF│   │  REST API, credentials      │     │
//! │  └─────────────────────────────┘   └─────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, LineItem, statuses)
//! - [`money`] - Money in integer paise
//! - [`totals`] - Subtotal, GST and grand total
//! - [`display`] - View-ready projection of one invoice
//! - [`filter`] - Tab / search / date-range filtering and pagination
//! - [`ingest`] - Coercion of API JSON into invoices and back
//! - [`draft`] - Invoice builder with a single validation step
//! - [`store`] - Owned invoice collection driven by explicit actions
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules
//!
//! ## Example Usage
//!
//! ```rust
//! use bizdash_core::money::Money;
//! use bizdash_core::totals::InvoiceTotals;
//! use bizdash_core::types::LineItem;
//!
//! let items = vec![
//!     LineItem::new("Laptop", 2, Money::from_rupees(5_000)),
//!     LineItem::new("Dock", 2, Money::from_rupees(2_500)),
//! ];
//!
//! let totals = InvoiceTotals::compute(&items, true);
//! assert_eq!(totals.subtotal, Money::from_rupees(15_000));
//! assert_eq!(totals.gst_amount, Money::from_rupees(2_700));
//! assert_eq!(totals.total.format_inr(), "₹17,700.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod display;
pub mod draft;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod money;
pub mod store;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use display::{format_invoice_for_display, DisplayModel};
pub use draft::InvoiceDraft;
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::{apply_filters, paginate, DateRange, FilterCriteria, FilterState, Page, TabFilter};
pub use money::Money;
pub use store::{InvoiceAction, InvoiceStore};
pub use totals::{compute_gst, compute_subtotal, compute_total, InvoiceTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// GST applied to `gst` invoices, in basis points (18%).
pub const GST_RATE_BPS: u32 = 1800;

/// Wire and form format of invoice dates.
pub const INVOICE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Maximum quantity on a single line item.
///
/// Catches a mistyped quantity (1000 instead of 10) at draft time.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound for a requested page size.
pub const MAX_PAGE_SIZE: usize = 500;

/// Maximum search term length, after trimming.
pub const MAX_SEARCH_LEN: usize = 100;

/// Maximum length of names, emails and addresses.
pub const MAX_TEXT_LEN: usize = 200;
