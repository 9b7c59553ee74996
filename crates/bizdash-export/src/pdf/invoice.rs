//! # Single-Invoice PDF Exporter
//!
//! `<invoiceNo>.pdf`: one structured document per invoice.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ INVOICE                    Invoice No  ...   │
//! │                            Date        ...   │
//! │                            Type        ...   │
//! │ Bill To                    GST Details       │ ← right block iff gst
//! │ name / phone / email /     name / GSTIN /    │
//! │ address                    phone / ...       │
//! │ #  Product  Serial No  Qty  Unit Price  Total│ ← header repeats on
//! │ 1  Laptop   LP-1         1  Rs. 25,000  ...  │   continuation pages
//! │                         Subtotal      ...    │
//! │                         GST @ 18%     ...    │ ← iff gst
//! │                         Grand Total   ...    │
//! │ Delivery ...   Payment ...                   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The caller resolves the invoice; a missing one never reaches this module.

use bizdash_core::display::{format_invoice_for_display, DisplayModel};
use bizdash_core::types::{Invoice, TaxRate};
use tracing::debug;

use super::{truncate, wrap_lines, PdfCanvas, A4_PORTRAIT, FOOTER_Y, MARGIN};
use crate::artifact::{safe_file_name, ExportArtifact, PDF_CONTENT_TYPE};
use crate::error::ExportResult;

const BODY_SIZE: f32 = 9.5;
const LINE: f32 = 5.0;
const ROW_HEIGHT: f32 = 6.5;
/// Items stop here and continue on a new page.
const ITEMS_BOTTOM: f32 = FOOTER_Y + 15.0;
/// Space the totals and transport/payment blocks need below the last item.
const CLOSING_BLOCK_HEIGHT: f32 = 45.0;

const COL_POS: f32 = MARGIN;
const COL_PRODUCT: f32 = 23.0;
const COL_SERIAL: f32 = 90.0;
const COL_QTY_RIGHT: f32 = 140.0;
const COL_PRICE_RIGHT: f32 = 168.0;
const COL_TOTAL_RIGHT: f32 = 195.0;
const RIGHT_BLOCK_X: f32 = 115.0;

/// One line-item row as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub position: usize,
    pub product: String,
    pub serial_no: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
}

/// Printable content of one invoice, before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub title: String,
    /// `(label, value)` pairs at the top right.
    pub header: Vec<(String, String)>,
    pub bill_to: Vec<String>,
    /// Present iff the invoice carries the `gst` flag.
    pub gst_block: Option<Vec<String>>,
    pub items: Vec<ItemRow>,
    /// `(label, amount)`; the last entry is the grand total.
    pub totals: Vec<(String, String)>,
    pub transport: Vec<String>,
    pub payment: Vec<String>,
}

impl InvoiceDocument {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self::from_model(&format_invoice_for_display(invoice))
    }

    pub fn from_model(model: &DisplayModel) -> Self {
        let invoice = &model.invoice;

        let title = if invoice.quotation {
            "QUOTATION"
        } else if invoice.gst {
            "TAX INVOICE"
        } else {
            "INVOICE"
        };

        let header = vec![
            ("Invoice No".to_string(), invoice.invoice_no.clone()),
            ("Date".to_string(), model.date_label.clone()),
            ("Type".to_string(), model.type_label.clone()),
        ];

        let bill_to = non_blank(vec![
            invoice.customer.name.clone(),
            labelled("Phone", &model.customer_phone_label),
            labelled("Email", &invoice.customer.email),
            invoice.customer.address.clone(),
        ]);

        // Blank GST fields still print their labels.
        let gst_block = model.gst_block.as_ref().map(|block| {
            vec![
                format!("Name: {}", block.name),
                format!("GSTIN: {}", block.number),
                format!("Phone: {}", block.phone),
                format!("Email: {}", block.email),
                format!("Address: {}", block.address),
            ]
        });

        let items = invoice
            .products
            .iter()
            .zip(&model.lines)
            .map(|(item, line)| ItemRow {
                position: line.position,
                product: line.product_name.clone(),
                serial_no: line.serial_no.clone(),
                quantity: item.quantity.to_string(),
                unit_price: item.unit_price.format_inr_ascii(),
                line_total: item.line_total().format_inr_ascii(),
            })
            .collect();

        let mut totals = vec![("Subtotal".to_string(), model.totals.subtotal.format_inr_ascii())];
        if invoice.gst {
            totals.push((
                format!("GST @ {}%", TaxRate::GST.percentage()),
                model.totals.gst_amount.format_inr_ascii(),
            ));
        }
        totals.push(("Grand Total".to_string(), model.totals.total.format_inr_ascii()));

        let transport = non_blank(vec![
            format!("Status: {}", model.delivery_status_label),
            labelled("Delivery date", &model.delivery_date_label),
        ]);

        let payment = vec![
            format!("Status: {}", model.payment_status_label),
            format!("Method: {}", model.payment_type_label),
        ];

        InvoiceDocument {
            title: title.to_string(),
            header,
            bill_to,
            gst_block,
            items,
            totals,
            transport,
            payment,
        }
    }
}

fn labelled(label: &str, value: &str) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        format!("{label}: {value}")
    }
}

fn non_blank(lines: Vec<String>) -> Vec<String> {
    lines.into_iter().filter(|l| !l.trim().is_empty()).collect()
}

/// Builds `<invoiceNo>.pdf` for one invoice.
pub fn export_single_invoice_to_pdf(invoice: &Invoice) -> ExportResult<ExportArtifact> {
    let document = InvoiceDocument::from_invoice(invoice);
    let title = format!("{} {}", document.title, invoice.invoice_no);

    let mut canvas = PdfCanvas::new(&title, A4_PORTRAIT)?;
    render(&mut canvas, &document);
    canvas.stamp_page_numbers();

    let pages = canvas.page_count();
    let bytes = canvas.finish()?;

    debug!(
        invoice_no = %invoice.invoice_no,
        items = document.items.len(),
        pages,
        "Invoice PDF built"
    );

    Ok(ExportArtifact {
        file_name: safe_file_name(&invoice.invoice_no, "pdf"),
        content_type: PDF_CONTENT_TYPE,
        bytes,
        row_count: document.items.len(),
    })
}

fn render(canvas: &mut PdfCanvas, doc: &InvoiceDocument) {
    let top = canvas.size().height - MARGIN - 5.0;
    let right = canvas.size().width - MARGIN;

    // Title and header
    canvas.bold(&doc.title, 20.0, MARGIN, top);
    let mut y = top;
    for (label, value) in &doc.header {
        canvas.bold(label, BODY_SIZE, RIGHT_BLOCK_X, y);
        canvas.text(&truncate(value, 32), BODY_SIZE, RIGHT_BLOCK_X + 25.0, y);
        y -= LINE;
    }
    y -= 6.0;
    canvas.rule(MARGIN, right, y + 2.0, 0.4);
    y -= 4.0;

    // Parties
    let block_top = y;
    canvas.bold("Bill To", 10.5, MARGIN, y);
    y -= LINE + 1.0;
    for line in doc.bill_to.iter().flat_map(|l| wrap_lines(l, 48)) {
        canvas.text(&line, BODY_SIZE, MARGIN, y);
        y -= LINE;
    }

    if let Some(gst_lines) = &doc.gst_block {
        let mut gy = block_top;
        canvas.bold("GST Details", 10.5, RIGHT_BLOCK_X, gy);
        gy -= LINE + 1.0;
        for line in gst_lines.iter().flat_map(|l| wrap_lines(l, 42)) {
            canvas.text(&line, BODY_SIZE, RIGHT_BLOCK_X, gy);
            gy -= LINE;
        }
        y = y.min(gy);
    }
    y -= 6.0;

    // Items
    y = draw_item_header(canvas, y);
    for (idx, row) in doc.items.iter().enumerate() {
        let is_last = idx + 1 == doc.items.len();
        let needed = if is_last { CLOSING_BLOCK_HEIGHT } else { 0.0 };
        if y - needed < ITEMS_BOTTOM {
            canvas.new_page();
            y = draw_item_header(canvas, top);
        }
        draw_item(canvas, row, y);
        y -= ROW_HEIGHT;
    }
    if doc.items.is_empty() {
        canvas.text("No line items.", BODY_SIZE, COL_PRODUCT, y);
        y -= ROW_HEIGHT;
    }
    if y - CLOSING_BLOCK_HEIGHT < ITEMS_BOTTOM {
        canvas.new_page();
        y = top;
    }
    canvas.rule(MARGIN, right, y + 3.5, 0.4);
    y -= 3.0;

    // Totals
    let last = doc.totals.len().saturating_sub(1);
    for (idx, (label, amount)) in doc.totals.iter().enumerate() {
        let bold = idx == last;
        canvas.text_right(label, BODY_SIZE, COL_PRICE_RIGHT, y, bold);
        canvas.text_right(amount, BODY_SIZE, COL_TOTAL_RIGHT, y, bold);
        y -= LINE + 0.5;
    }
    y -= 4.0;

    // Transport & payment
    canvas.bold("Delivery", 10.0, MARGIN, y);
    canvas.bold("Payment", 10.0, RIGHT_BLOCK_X, y);
    let mut ty = y - LINE - 0.5;
    for line in &doc.transport {
        canvas.text(line, BODY_SIZE, MARGIN, ty);
        ty -= LINE;
    }
    let mut py = y - LINE - 0.5;
    for line in &doc.payment {
        canvas.text(line, BODY_SIZE, RIGHT_BLOCK_X, py);
        py -= LINE;
    }
}

/// Draws the item table header and returns the first row baseline.
fn draw_item_header(canvas: &PdfCanvas, y: f32) -> f32 {
    let right = canvas.size().width - MARGIN;

    canvas.bold("#", BODY_SIZE, COL_POS, y);
    canvas.bold("Product", BODY_SIZE, COL_PRODUCT, y);
    canvas.bold("Serial No", BODY_SIZE, COL_SERIAL, y);
    canvas.text_right("Qty", BODY_SIZE, COL_QTY_RIGHT, y, true);
    canvas.text_right("Unit Price", BODY_SIZE, COL_PRICE_RIGHT, y, true);
    canvas.text_right("Line Total", BODY_SIZE, COL_TOTAL_RIGHT, y, true);
    canvas.rule(MARGIN, right, y - 2.5, 0.6);

    y - 8.0
}

fn draw_item(canvas: &PdfCanvas, row: &ItemRow, y: f32) {
    canvas.text(&row.position.to_string(), BODY_SIZE, COL_POS, y);
    canvas.text(&truncate(&row.product, 34), BODY_SIZE, COL_PRODUCT, y);
    canvas.text(&truncate(&row.serial_no, 20), BODY_SIZE, COL_SERIAL, y);
    canvas.text_right(&row.quantity, BODY_SIZE, COL_QTY_RIGHT, y, false);
    canvas.text_right(&row.unit_price, BODY_SIZE, COL_PRICE_RIGHT, y, false);
    canvas.text_right(&row.line_total, BODY_SIZE, COL_TOTAL_RIGHT, y, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdash_core::money::Money;
    use bizdash_core::types::{CustomerDetails, GstDetails, LineItem};

    fn gst_invoice() -> Invoice {
        Invoice {
            invoice_no: "GST/24-25/17".to_string(),
            date: "15/03/2025".to_string(),
            customer: CustomerDetails {
                name: "John Doe".to_string(),
                phone: 9_876_543_210,
                ..CustomerDetails::default()
            },
            gst: true,
            gst_details: GstDetails {
                name: "Doe Traders".to_string(),
                number: "27AAPFU0939F1ZV".to_string(),
                ..GstDetails::default()
            },
            products: vec![
                LineItem::new("Laptop", 2, Money::from_rupees(5_000)).with_serial("LP-1, LP-2"),
                LineItem::new("Dock", 2, Money::from_rupees(2_500)),
            ],
            ..Invoice::default()
        }
    }

    #[test]
    fn test_document_for_gst_invoice() {
        let doc = InvoiceDocument::from_invoice(&gst_invoice());

        assert_eq!(doc.title, "TAX INVOICE");
        assert_eq!(doc.header[1].1, "15 Mar 2025");
        assert_eq!(doc.bill_to, vec!["John Doe", "Phone: 9876543210"]);

        let gst = doc.gst_block.expect("gst block");
        assert_eq!(gst[1], "GSTIN: 27AAPFU0939F1ZV");
        // blank fields keep their label
        assert_eq!(gst[3], "Email: ");

        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].serial_no, "LP-1, LP-2");
        assert_eq!(doc.items[0].line_total, "Rs. 10,000.00");

        assert_eq!(
            doc.totals,
            vec![
                ("Subtotal".to_string(), "Rs. 15,000.00".to_string()),
                ("GST @ 18%".to_string(), "Rs. 2,700.00".to_string()),
                ("Grand Total".to_string(), "Rs. 17,700.00".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_gst_block_without_flag() {
        let mut invoice = gst_invoice();
        invoice.gst = false;
        invoice.po = true;
        let doc = InvoiceDocument::from_invoice(&invoice);

        assert_eq!(doc.title, "INVOICE");
        assert!(doc.gst_block.is_none());
        assert_eq!(doc.totals.len(), 2);
        assert_eq!(doc.header[2].1, "PO");
    }

    #[test]
    fn test_export_single_invoice() {
        let artifact = export_single_invoice_to_pdf(&gst_invoice()).unwrap();

        assert_eq!(artifact.file_name, "GST-24-25-17.pdf");
        assert_eq!(artifact.row_count, 2);
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_many_items_span_pages() {
        let mut invoice = gst_invoice();
        invoice.products = (0..80)
            .map(|n| LineItem::new(format!("Part {n}"), 1, Money::from_rupees(10)))
            .collect();

        let artifact = export_single_invoice_to_pdf(&invoice).unwrap();
        assert_eq!(artifact.row_count, 80);
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_invoice_without_items() {
        let invoice = Invoice {
            invoice_no: "INV-EMPTY".to_string(),
            ..Invoice::default()
        };
        let artifact = export_single_invoice_to_pdf(&invoice).unwrap();
        assert_eq!(artifact.row_count, 0);
    }
}
