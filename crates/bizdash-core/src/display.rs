//! # Document Formatter
//!
//! Projects an invoice into a view-ready model: the untouched invoice, its
//! derived totals, and presentation strings (dates, rupee amounts, labels).
//!
//! ## Projection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  &Invoice ──► format_invoice_for_display ──► DisplayModel               │
//! │                                                                         │
//! │   date "15/03/2025"          ──► date_label "15 Mar 2025"               │
//! │   products                   ──► lines[] + InvoiceTotals                │
//! │   totals (paise)             ──► "₹17,700.00"                           │
//! │   gst / po / quotation       ──► type_label "GST, PO"                   │
//! │   gst_details (iff gst)      ──► gst_block                              │
//! │   payment / transport enums  ──► "Paid", "UPI", "In Transit"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The input is only borrowed. Blank GST fields on a `gst` invoice render as
//! blank strings; nothing is validated here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::totals::InvoiceTotals;
use crate::types::{parse_invoice_date, GstDetails, Invoice, LineItem, TaxRate};

/// Display date format: `15 Mar 2025`.
pub const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";

/// View-ready projection of one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DisplayModel {
    /// The source invoice, unchanged.
    pub invoice: Invoice,
    pub totals: InvoiceTotals,

    pub date_label: String,
    pub type_label: String,

    pub customer_phone_label: String,

    /// Present iff the invoice carries the `gst` flag.
    pub gst_block: Option<GstBlock>,

    pub lines: Vec<DisplayLine>,

    pub subtotal_label: String,
    pub gst_label: String,
    pub total_label: String,

    pub payment_status_label: String,
    pub payment_type_label: String,
    pub delivery_status_label: String,
    pub delivery_date_label: String,
}

impl DisplayModel {
    /// Hands back the invoice the model was built from.
    pub fn into_invoice(self) -> Invoice {
        self.invoice
    }
}

/// GST registration block printed on GST invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GstBlock {
    pub name: String,
    pub number: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// `18%`
    pub rate_label: String,
}

impl GstBlock {
    fn from_details(details: &GstDetails) -> Self {
        GstBlock {
            name: details.name.clone(),
            number: details.number.clone(),
            phone: phone_label(details.phone),
            email: details.email.clone(),
            address: details.address.clone(),
            rate_label: format!("{}%", TaxRate::GST.percentage()),
        }
    }
}

/// One printable line-item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLine {
    /// 1-based row number.
    pub position: usize,
    pub product_name: String,
    pub serial_no: String,
    pub quantity: i64,
    pub unit_price_label: String,
    pub line_total_label: String,
}

impl DisplayLine {
    fn from_item(position: usize, item: &LineItem) -> Self {
        DisplayLine {
            position,
            product_name: item.product_name.clone(),
            serial_no: item.serials().join(", "),
            quantity: item.quantity,
            unit_price_label: item.unit_price.format_inr(),
            line_total_label: item.line_total().format_inr(),
        }
    }
}

/// Builds the display model for one invoice.
pub fn format_invoice_for_display(invoice: &Invoice) -> DisplayModel {
    let totals = InvoiceTotals::for_invoice(invoice);

    DisplayModel {
        invoice: invoice.clone(),
        totals,
        date_label: format_date_label(&invoice.date),
        type_label: invoice.type_label(),
        customer_phone_label: phone_label(invoice.customer.phone),
        gst_block: invoice
            .gst
            .then(|| GstBlock::from_details(&invoice.gst_details)),
        lines: invoice
            .products
            .iter()
            .enumerate()
            .map(|(idx, item)| DisplayLine::from_item(idx + 1, item))
            .collect(),
        subtotal_label: totals.subtotal.format_inr(),
        gst_label: totals.gst_amount.format_inr(),
        total_label: totals.total.format_inr(),
        payment_status_label: invoice.payment_status.label(),
        payment_type_label: invoice.payment_type.label(),
        delivery_status_label: invoice.transport.delivery_status.label().to_string(),
        delivery_date_label: format_date_label(&invoice.transport.delivery_date),
    }
}

/// `15/03/2025` → `15 Mar 2025`; anything unparsable is returned verbatim.
pub fn format_date_label(raw: &str) -> String {
    match parse_invoice_date(raw) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.trim().to_string(),
    }
}

/// Empty for the coerced zero, digits otherwise.
pub fn phone_label(phone: u64) -> String {
    if phone == 0 {
        String::new()
    } else {
        phone.to_string()
    }
}
