//! # Domain Types
//!
//! Core invoice types used throughout Bizdash.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Invoice                                                        │   │
//! │  │  ─────────────────────────────────────────────────────────────  │   │
//! │  │  id (server)  invoice_no (display)  date "DD/MM/YYYY"           │   │
//! │  │  gst / po / quotation flags (non-exclusive)                     │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────────┐ ┌───────────────┐ ┌───────────────────────┐ │   │
//! │  │  │CustomerDetails│ │  GstDetails   │ │ TransportDetails      │ │   │
//! │  │  │ name, phone   │ │ only if gst   │ │ DeliveryStatus, date  │ │   │
//! │  │  └───────────────┘ └───────────────┘ └───────────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │  products: Vec<LineItem>    PaymentStatus    PaymentType        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │    TaxRate      │   GST = 1800 bps (18%)                            │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line items have no identity outside their invoice; edits replace the
//! whole invoice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::{GST_RATE_BPS, INVOICE_DATE_FORMAT};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1800 bps = 18%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// The fixed GST rate applied to `gst` invoices.
    pub const GST: TaxRate = TaxRate(GST_RATE_BPS);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product row within an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_name: String,

    /// Units sold. The form layer keeps this ≥ 1.
    pub quantity: i64,

    /// Unit price in paise.
    pub unit_price: Money,

    /// Free text; several serials may be comma-joined.
    pub serial_no: String,
}

impl LineItem {
    /// Creates a line item without serial numbers.
    pub fn new(product_name: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        LineItem {
            product_name: product_name.into(),
            quantity,
            unit_price,
            serial_no: String::new(),
        }
    }

    /// Sets the serial number text.
    pub fn with_serial(mut self, serial_no: impl Into<String>) -> Self {
        self.serial_no = serial_no.into();
        self
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Splits the comma-joined serial text into trimmed, non-empty serials.
    pub fn serials(&self) -> Vec<&str> {
        self.serial_no
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

// =============================================================================
// Party Details
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    /// Digits only; 0 when the API sent nothing usable.
    pub phone: u64,
    pub email: String,
    pub address: String,
}

/// GST registration of the buyer. Only meaningful when `Invoice::gst` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GstDetails {
    pub name: String,
    pub number: String,
    pub phone: u64,
    pub email: String,
    pub address: String,
}

impl GstDetails {
    /// True when every field is blank.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.number.trim().is_empty()
            && self.phone == 0
            && self.email.trim().is_empty()
            && self.address.trim().is_empty()
    }
}

// =============================================================================
// Transport
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    /// Lenient parse used at ingestion; unknown text becomes `Pending`.
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match normalized.as_str() {
            "processing" => DeliveryStatus::Processing,
            "shipped" | "dispatched" => DeliveryStatus::Shipped,
            "intransit" => DeliveryStatus::InTransit,
            "delivered" => DeliveryStatus::Delivered,
            "cancelled" | "canceled" => DeliveryStatus::Cancelled,
            _ => DeliveryStatus::Pending,
        }
    }

    /// Wire value (`in_transit`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Processing => "processing",
            DeliveryStatus::Shipped => "shipped",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }

    /// Human label (`In Transit`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::Processing => "Processing",
            DeliveryStatus::Shipped => "Shipped",
            DeliveryStatus::InTransit => "In Transit",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransportDetails {
    pub delivery_status: DeliveryStatus,
    /// Free text as entered; usually `DD/MM/YYYY`.
    pub delivery_date: String,
}

// =============================================================================
// Payment
// =============================================================================

/// Payment status. Free text on the wire; known values get typed variants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Partial,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PaymentStatus::Paid => "Paid".to_string(),
            PaymentStatus::Pending => "Pending".to_string(),
            PaymentStatus::Partial => "Partial".to_string(),
            PaymentStatus::Other(raw) => raw.clone(),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "paid" => PaymentStatus::Paid,
            "" | "pending" => PaymentStatus::Pending,
            "partial" => PaymentStatus::Partial,
            _ => PaymentStatus::Other(raw.trim().to_string()),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment type. Free text on the wire; known values get typed variants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentType {
    #[default]
    Cash,
    Card,
    Upi,
    Bank,
    Other(String),
}

impl PaymentType {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::Card => "card",
            PaymentType::Upi => "upi",
            PaymentType::Bank => "bank",
            PaymentType::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PaymentType::Cash => "Cash".to_string(),
            PaymentType::Card => "Card".to_string(),
            PaymentType::Upi => "UPI".to_string(),
            PaymentType::Bank => "Bank Transfer".to_string(),
            PaymentType::Other(raw) => raw.clone(),
        }
    }
}

impl From<String> for PaymentType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "cash" => PaymentType::Cash,
            "card" => PaymentType::Card,
            "upi" => PaymentType::Upi,
            "bank" | "bank transfer" => PaymentType::Bank,
            _ => PaymentType::Other(raw.trim().to_string()),
        }
    }
}

impl From<PaymentType> for String {
    fn from(kind: PaymentType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Document Kind
// =============================================================================

/// The document-type flags an invoice can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DocumentKind {
    Gst,
    Po,
    Quotation,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Gst => "GST",
            DocumentKind::Po => "PO",
            DocumentKind::Quotation => "Quotation",
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// One customer transaction document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Server identifier. `None` until the API has stored the invoice.
    pub id: Option<String>,

    /// Display code, e.g. `INV-2025-002`.
    pub invoice_no: String,

    /// `DD/MM/YYYY` as stored by the API.
    pub date: String,

    pub customer: CustomerDetails,

    pub gst: bool,
    pub po: bool,
    pub quotation: bool,

    pub gst_details: GstDetails,

    pub products: Vec<LineItem>,

    pub transport: TransportDetails,

    #[ts(as = "String")]
    pub payment_status: PaymentStatus,

    #[ts(as = "String")]
    pub payment_type: PaymentType,
}

impl Invoice {
    /// Parses `date`; `None` when it is not a valid `DD/MM/YYYY` date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_invoice_date(&self.date)
    }

    /// The flags set on this invoice, in GST, PO, Quotation order.
    pub fn kinds(&self) -> Vec<DocumentKind> {
        [
            (self.gst, DocumentKind::Gst),
            (self.po, DocumentKind::Po),
            (self.quotation, DocumentKind::Quotation),
        ]
        .into_iter()
        .filter_map(|(set, kind)| set.then_some(kind))
        .collect()
    }

    /// No document-type flag set.
    pub fn is_regular(&self) -> bool {
        !(self.gst || self.po || self.quotation)
    }

    /// `"GST, PO"`-style label, or `"Regular"` when no flag is set.
    pub fn type_label(&self) -> String {
        let kinds = self.kinds();
        if kinds.is_empty() {
            return "Regular".to_string();
        }
        kinds
            .iter()
            .map(DocumentKind::label)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// True when `key` equals the server id or the invoice number.
    pub fn matches_key(&self, key: &str) -> bool {
        self.id.as_deref() == Some(key) || self.invoice_no == key
    }
}

/// Parses a `DD/MM/YYYY` date string (surrounding whitespace ignored).
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), INVOICE_DATE_FORMAT).ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gst_rate() {
        assert_eq!(TaxRate::GST.bps(), 1800);
        assert!((TaxRate::GST.percentage() - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_type_label() {
        let mut invoice = Invoice::default();
        assert_eq!(invoice.type_label(), "Regular");
        assert!(invoice.is_regular());

        invoice.po = true;
        assert_eq!(invoice.type_label(), "PO");

        invoice.gst = true;
        invoice.quotation = true;
        assert_eq!(invoice.type_label(), "GST, PO, Quotation");
        assert!(!invoice.is_regular());
    }

    #[test]
    fn test_parse_invoice_date() {
        assert_eq!(
            parse_invoice_date("15/03/2025"),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
        assert_eq!(
            parse_invoice_date(" 01/12/2024 "),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
        assert!(parse_invoice_date("2025-03-15").is_none());
        assert!(parse_invoice_date("31/02/2025").is_none());
        assert!(parse_invoice_date("").is_none());
    }

    #[test]
    fn test_line_item_serials() {
        let item = LineItem::new("Router", 2, Money::from_rupees(1_500))
            .with_serial("SN-1, SN-2,, ");
        assert_eq!(item.serials(), vec!["SN-1", "SN-2"]);
        assert_eq!(item.line_total(), Money::from_rupees(3_000));
    }

    #[test]
    fn test_payment_status_free_text() {
        assert_eq!(PaymentStatus::from("PAID".to_string()), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from(String::new()), PaymentStatus::Pending);
        assert_eq!(
            PaymentStatus::from("on hold".to_string()),
            PaymentStatus::Other("on hold".to_string())
        );
        assert_eq!(PaymentStatus::Other("on hold".into()).label(), "on hold");
    }

    #[test]
    fn test_payment_type_labels() {
        assert_eq!(PaymentType::from("upi".to_string()).label(), "UPI");
        assert_eq!(PaymentType::from("bank".to_string()).label(), "Bank Transfer");
        assert_eq!(PaymentType::from("cheque".to_string()).as_str(), "cheque");
    }

    #[test]
    fn test_delivery_status_lenient() {
        assert_eq!(DeliveryStatus::parse_lenient("In Transit"), DeliveryStatus::InTransit);
        assert_eq!(DeliveryStatus::parse_lenient("in_transit"), DeliveryStatus::InTransit);
        assert_eq!(DeliveryStatus::parse_lenient("DELIVERED"), DeliveryStatus::Delivered);
        assert_eq!(DeliveryStatus::parse_lenient("???"), DeliveryStatus::Pending);
    }

    #[test]
    fn test_matches_key() {
        let invoice = Invoice {
            id: Some("65f0c2".to_string()),
            invoice_no: "INV-2025-002".to_string(),
            ..Invoice::default()
        };
        assert!(invoice.matches_key("65f0c2"));
        assert!(invoice.matches_key("INV-2025-002"));
        assert!(!invoice.matches_key("INV-2025-003"));
    }
}
