//! # Invoice Draft Builder
//!
//! Builds an invoice field by field and validates it once, at submit time.
//!
//! ```text
//!  InvoiceDraft::new()
//!     .invoice_no(..) .date(..) .customer_name(..) ...   ← any order
//!     .add_item(..)                                       ← repeatable
//!     .validate()  ──► Ok(Invoice) | Err(Vec<ValidationError>)
//! ```
//!
//! `validate` runs every rule and returns all failures, so a form can mark
//! every bad field in one pass. Editing an existing invoice starts from
//! [`InvoiceDraft::from_invoice`] and keeps its identifier.

use crate::error::ValidationError;
use crate::money::Money;
use crate::totals::InvoiceTotals;
use crate::types::{
    CustomerDetails, DeliveryStatus, GstDetails, Invoice, LineItem, PaymentStatus, PaymentType,
    TransportDetails,
};
use crate::validation::{
    validate_email, validate_gstin, validate_invoice_date, validate_invoice_no, validate_phone,
    validate_price, validate_quantity, validate_required_text, ValidationResult,
};
use crate::MAX_TEXT_LEN;

/// An invoice under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceDraft {
    id: Option<String>,
    invoice_no: String,
    date: String,
    customer: CustomerDetails,
    gst: bool,
    po: bool,
    quotation: bool,
    gst_details: GstDetails,
    products: Vec<LineItem>,
    transport: TransportDetails,
    payment_status: PaymentStatus,
    payment_type: PaymentType,
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an edit of a stored invoice. The identifier is carried over.
    pub fn from_invoice(invoice: Invoice) -> Self {
        InvoiceDraft {
            id: invoice.id,
            invoice_no: invoice.invoice_no,
            date: invoice.date,
            customer: invoice.customer,
            gst: invoice.gst,
            po: invoice.po,
            quotation: invoice.quotation,
            gst_details: invoice.gst_details,
            products: invoice.products,
            transport: invoice.transport,
            payment_status: invoice.payment_status,
            payment_type: invoice.payment_type,
        }
    }

    // -------------------------------------------------------------------------
    // Header
    // -------------------------------------------------------------------------

    pub fn invoice_no(mut self, invoice_no: impl Into<String>) -> Self {
        self.invoice_no = invoice_no.into();
        self
    }

    /// `DD/MM/YYYY`.
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn gst(mut self, gst: bool) -> Self {
        self.gst = gst;
        self
    }

    pub fn po(mut self, po: bool) -> Self {
        self.po = po;
        self
    }

    pub fn quotation(mut self, quotation: bool) -> Self {
        self.quotation = quotation;
        self
    }

    // -------------------------------------------------------------------------
    // Parties
    // -------------------------------------------------------------------------

    pub fn customer(mut self, customer: CustomerDetails) -> Self {
        self.customer = customer;
        self
    }

    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer.name = name.into();
        self
    }

    pub fn customer_phone(mut self, phone: u64) -> Self {
        self.customer.phone = phone;
        self
    }

    pub fn customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer.email = email.into();
        self
    }

    pub fn customer_address(mut self, address: impl Into<String>) -> Self {
        self.customer.address = address.into();
        self
    }

    /// GST registration block. Kept but ignored by validation unless `gst` is set.
    pub fn gst_details(mut self, details: GstDetails) -> Self {
        self.gst_details = details;
        self
    }

    // -------------------------------------------------------------------------
    // Line items
    // -------------------------------------------------------------------------

    pub fn item(mut self, item: LineItem) -> Self {
        self.products.push(item);
        self
    }

    pub fn add_item(&mut self, item: LineItem) {
        self.products.push(item);
    }

    /// Removes the item at `index`; out-of-range indices are ignored.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        (index < self.products.len()).then(|| self.products.remove(index))
    }

    pub fn items(&self) -> &[LineItem] {
        &self.products
    }

    /// Live totals for the items entered so far.
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(&self.products, self.gst)
    }

    // -------------------------------------------------------------------------
    // Transport & payment
    // -------------------------------------------------------------------------

    pub fn delivery_status(mut self, status: DeliveryStatus) -> Self {
        self.transport.delivery_status = status;
        self
    }

    pub fn delivery_date(mut self, date: impl Into<String>) -> Self {
        self.transport.delivery_date = date.into();
        self
    }

    pub fn payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = status;
        self
    }

    pub fn payment_type(mut self, kind: PaymentType) -> Self {
        self.payment_type = kind;
        self
    }

    // -------------------------------------------------------------------------
    // Submit
    // -------------------------------------------------------------------------

    /// Runs every rule and returns the finished invoice, or every failure.
    ///
    /// Text fields are trimmed on success.
    pub fn validate(self) -> Result<Invoice, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut check = |result: ValidationResult<()>| {
            if let Err(err) = result {
                errors.push(err);
            }
        };

        check(validate_invoice_no(&self.invoice_no));
        check(validate_invoice_date(&self.date));

        check(validate_required_text("customer name", &self.customer.name));
        check(validate_phone("customer phone", self.customer.phone));
        check(validate_email("customer email", &self.customer.email));
        check(validate_optional_text("customer address", &self.customer.address));

        if self.gst {
            check(validate_required_text("GST name", &self.gst_details.name));
            check(validate_gstin(&self.gst_details.number));
            check(validate_email("GST email", &self.gst_details.email));
            if self.gst_details.phone != 0 {
                check(validate_phone("GST phone", self.gst_details.phone));
            }
            check(validate_optional_text("GST address", &self.gst_details.address));
        }

        if self.products.is_empty() {
            check(Err(ValidationError::Required {
                field: "products".to_string(),
            }));
        }
        for (idx, item) in self.products.iter().enumerate() {
            check(
                validate_required_text("product name", &item.product_name)
                    .map_err(|err| at_row(idx, err)),
            );
            check(validate_quantity(item.quantity).map_err(|err| at_row(idx, err)));
            check(validate_price(item.unit_price).map_err(|err| at_row(idx, err)));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(self.into_invoice())
    }

    fn into_invoice(self) -> Invoice {
        let trim = |s: String| s.trim().to_string();

        Invoice {
            id: self.id,
            invoice_no: trim(self.invoice_no),
            date: trim(self.date),
            customer: CustomerDetails {
                name: trim(self.customer.name),
                phone: self.customer.phone,
                email: trim(self.customer.email),
                address: trim(self.customer.address),
            },
            gst: self.gst,
            po: self.po,
            quotation: self.quotation,
            gst_details: GstDetails {
                name: trim(self.gst_details.name),
                number: trim(self.gst_details.number),
                phone: self.gst_details.phone,
                email: trim(self.gst_details.email),
                address: trim(self.gst_details.address),
            },
            products: self
                .products
                .into_iter()
                .map(|item| LineItem {
                    product_name: trim(item.product_name),
                    serial_no: trim(item.serial_no),
                    ..item
                })
                .collect(),
            transport: TransportDetails {
                delivery_status: self.transport.delivery_status,
                delivery_date: trim(self.transport.delivery_date),
            },
            payment_status: self.payment_status,
            payment_type: self.payment_type,
        }
    }
}

fn validate_optional_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

/// Prefixes the field with its 1-based row: `item 2: quantity`.
fn at_row(idx: usize, err: ValidationError) -> ValidationError {
    let field = format!("item {}: {}", idx + 1, err.field());
    match err {
        ValidationError::Required { .. } => ValidationError::Required { field },
        ValidationError::TooLong { max, .. } => ValidationError::TooLong { field, max },
        ValidationError::OutOfRange { min, max, .. } => ValidationError::OutOfRange { field, min, max },
        ValidationError::MustBePositive { .. } => ValidationError::MustBePositive { field },
        ValidationError::InvalidFormat { reason, .. } => ValidationError::InvalidFormat { field, reason },
        ValidationError::NotAllowed { allowed, .. } => ValidationError::NotAllowed { field, allowed },
    }
}

impl From<Invoice> for InvoiceDraft {
    fn from(invoice: Invoice) -> Self {
        InvoiceDraft::from_invoice(invoice)
    }
}

/// Convenience for building a priced line from rupee input.
pub fn line_item(name: &str, quantity: i64, unit_price_rupees: f64, serial_no: &str) -> LineItem {
    LineItem::new(name, quantity, Money::from_decimal_rupees(unit_price_rupees)).with_serial(serial_no)
}

// =============================================================================
// Unit Tests
// =============================================================================
