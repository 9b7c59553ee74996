//! # Line-Item Aggregator
//!
//! Derived invoice totals. Nothing here is persisted: totals are recomputed
//! from the line items every time they are needed, so an edited product list
//! can never leave a stale total behind.
//!
//! ```text
//!  products ──► compute_subtotal ──► subtotal ─┬────────────► compute_total ──► total
//!                                               │                  ▲
//!                      gst flag ──► compute_gst ┴──► gst_amount ───┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Invoice, LineItem, TaxRate};

/// Σ(unit price × quantity). An empty list yields zero.
///
/// Quantities and prices are not validated here; the draft builder owns that.
pub fn compute_subtotal(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::line_total).sum()
}

/// GST at the fixed 18% rate when `gst_flag` is set, zero otherwise.
pub fn compute_gst(subtotal: Money, gst_flag: bool) -> Money {
    if gst_flag {
        subtotal.calculate_tax(TaxRate::GST)
    } else {
        Money::zero()
    }
}

/// Subtotal plus GST. No rounding happens at this layer.
#[inline]
pub fn compute_total(subtotal: Money, gst_amount: Money) -> Money {
    subtotal + gst_amount
}

/// The three derived amounts of one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub gst_amount: Money,
    pub total: Money,
}

impl InvoiceTotals {
    /// Computes totals for a line-item list and GST flag.
    pub fn compute(items: &[LineItem], gst_flag: bool) -> Self {
        let subtotal = compute_subtotal(items);
        let gst_amount = compute_gst(subtotal, gst_flag);
        InvoiceTotals {
            subtotal,
            gst_amount,
            total: compute_total(subtotal, gst_amount),
        }
    }

    /// Computes totals for an invoice.
    pub fn for_invoice(invoice: &Invoice) -> Self {
        Self::compute(&invoice.products, invoice.gst)
    }
}
