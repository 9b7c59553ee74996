//! # PDF Report Exporter
//!
//! `invoices.pdf`: a landscape table of the given invoices.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │ Invoice Report                                                    │
//! │ Generated 17 Oct 2026, 14:30 · 23 invoices                        │
//! │ Invoice No   Date        Customer        Amount   Status   Type   │ ← repeated
//! │ ───────────────────────────────────────────────────────────────── │   per page
//! │ INV-2025-002 15/03/2025  John Doe   Rs. 27,000.00 Paid     PO     │
//! │ ...                                                               │
//! │                                                      Page 1 of 2  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

use bizdash_core::totals::InvoiceTotals;
use bizdash_core::types::Invoice;
use chrono::{Local, NaiveDateTime};
use tracing::debug;

use super::{plan_pages, truncate, PdfCanvas, A4_LANDSCAPE, FOOTER_Y, MARGIN};
use crate::artifact::{ExportArtifact, PDF_CONTENT_TYPE};
use crate::error::ExportResult;

pub const REPORT_FILE_NAME: &str = "invoices.pdf";
pub const REPORT_TITLE: &str = "Invoice Report";
pub const REPORT_COLUMNS: [&str; 6] = ["Invoice No", "Date", "Customer", "Amount", "Status", "Type"];

const ROW_HEIGHT: f32 = 7.0;
const BODY_SIZE: f32 = 9.0;
const HEADER_SIZE: f32 = 9.5;
const BOTTOM_LIMIT: f32 = FOOTER_Y + 10.0;

const COL_INVOICE_NO: f32 = MARGIN;
const COL_DATE: f32 = 65.0;
const COL_CUSTOMER: f32 = 95.0;
const COL_AMOUNT_RIGHT: f32 = 215.0;
const COL_STATUS: f32 = 225.0;
const COL_TYPE: f32 = 250.0;

/// One table body row, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub invoice_no: String,
    pub date: String,
    pub customer: String,
    pub amount: String,
    pub status: String,
    pub type_label: String,
}

impl ReportRow {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        ReportRow {
            invoice_no: invoice.invoice_no.clone(),
            date: invoice.date.clone(),
            customer: invoice.customer.name.clone(),
            amount: InvoiceTotals::for_invoice(invoice).total.format_inr_ascii(),
            status: invoice.payment_status.label(),
            type_label: invoice.type_label(),
        }
    }
}

pub fn report_rows(invoices: &[Invoice]) -> Vec<ReportRow> {
    invoices.iter().map(ReportRow::from_invoice).collect()
}

/// Builds `invoices.pdf` stamped with the current local time.
pub fn export_to_pdf_report(invoices: &[Invoice]) -> ExportResult<ExportArtifact> {
    export_to_pdf_report_at(invoices, Local::now().naive_local())
}

/// Builds `invoices.pdf` with an explicit generation timestamp.
pub fn export_to_pdf_report_at(
    invoices: &[Invoice],
    generated_at: NaiveDateTime,
) -> ExportResult<ExportArtifact> {
    let rows = report_rows(invoices);
    let mut canvas = PdfCanvas::new(REPORT_TITLE, A4_LANDSCAPE)?;
    let top = canvas.size().height - MARGIN - 5.0;

    // Title block, first page only
    canvas.bold(REPORT_TITLE, 18.0, MARGIN, top);
    let subtitle = format!(
        "Generated {} - {} invoice{}",
        generated_at.format("%d %b %Y, %H:%M"),
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    );
    canvas.text(&subtitle, 9.0, MARGIN, top - 7.0);

    let first_header_y = top - 18.0;
    let pages = plan_pages(
        rows.len(),
        rows_fitting(first_header_y),
        rows_fitting(top),
    );

    let mut drawn = 0;
    for (page_no, range) in pages.iter().enumerate() {
        let header_y = if page_no == 0 {
            first_header_y
        } else {
            canvas.new_page();
            top
        };

        let mut y = draw_header(&canvas, header_y);
        for row in &rows[range.clone()] {
            draw_row(&canvas, row, y);
            y -= ROW_HEIGHT;
            drawn += 1;
        }
    }

    if rows.is_empty() {
        canvas.text("No invoices to show.", BODY_SIZE, MARGIN, first_header_y - 8.0);
    }

    canvas.stamp_page_numbers();
    let page_count = canvas.page_count();
    let bytes = canvas.finish()?;

    debug!(rows = drawn, pages = page_count, bytes = bytes.len(), "PDF report built");

    Ok(ExportArtifact {
        file_name: REPORT_FILE_NAME.to_string(),
        content_type: PDF_CONTENT_TYPE,
        bytes,
        row_count: drawn,
    })
}

/// Body rows that fit below a header drawn at `header_y`.
fn rows_fitting(header_y: f32) -> usize {
    let first_row_y = header_y - 8.0;
    if first_row_y < BOTTOM_LIMIT {
        return 1;
    }
    ((first_row_y - BOTTOM_LIMIT) / ROW_HEIGHT) as usize + 1
}

/// Draws the column header and returns the baseline of the first body row.
fn draw_header(canvas: &PdfCanvas, y: f32) -> f32 {
    let right = canvas.size().width - MARGIN;

    canvas.bold(REPORT_COLUMNS[0], HEADER_SIZE, COL_INVOICE_NO, y);
    canvas.bold(REPORT_COLUMNS[1], HEADER_SIZE, COL_DATE, y);
    canvas.bold(REPORT_COLUMNS[2], HEADER_SIZE, COL_CUSTOMER, y);
    canvas.text_right(REPORT_COLUMNS[3], HEADER_SIZE, COL_AMOUNT_RIGHT, y, true);
    canvas.bold(REPORT_COLUMNS[4], HEADER_SIZE, COL_STATUS, y);
    canvas.bold(REPORT_COLUMNS[5], HEADER_SIZE, COL_TYPE, y);
    canvas.rule(MARGIN, right, y - 2.5, 0.6);

    y - 8.0
}

fn draw_row(canvas: &PdfCanvas, row: &ReportRow, y: f32) {
    canvas.text(&truncate(&row.invoice_no, 24), BODY_SIZE, COL_INVOICE_NO, y);
    canvas.text(&truncate(&row.date, 14), BODY_SIZE, COL_DATE, y);
    canvas.text(&truncate(&row.customer, 42), BODY_SIZE, COL_CUSTOMER, y);
    canvas.text_right(&row.amount, BODY_SIZE, COL_AMOUNT_RIGHT, y, false);
    canvas.text(&truncate(&row.status, 12), BODY_SIZE, COL_STATUS, y);
    canvas.text(&truncate(&row.type_label, 20), BODY_SIZE, COL_TYPE, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdash_core::money::Money;
    use bizdash_core::types::LineItem;
    use chrono::NaiveDate;
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    /// Text drawn on each page, in drawing order.
    fn drawn_text(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj" || op.operator == "TJ")
                    .flat_map(|op| op.operands.iter())
                    .flat_map(|operand| match operand {
                        Object::Array(items) => items.clone(),
                        other => vec![other.clone()],
                    })
                    .filter_map(|operand| match operand {
                        Object::String(raw, _) => Some(String::from_utf8_lossy(&raw).into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    fn invoice_numbers(pages: &[Vec<String>]) -> Vec<String> {
        pages
            .iter()
            .flatten()
            .filter(|text| text.starts_with("INV-"))
            .cloned()
            .collect()
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 31)
            .and_then(|d| d.and_hms_opt(18, 0, 0))
            .unwrap()
    }

    fn invoice(n: usize) -> Invoice {
        Invoice {
            invoice_no: format!("INV-{n:04}"),
            date: "15/03/2025".to_string(),
            po: n % 2 == 0,
            products: vec![LineItem::new("Item", 1, Money::from_rupees(1_000))],
            ..Invoice::default()
        }
    }

    #[test]
    fn test_report_row_formatting() {
        let mut inv = invoice(2);
        inv.products.push(LineItem::new("Bag", 1, Money::from_rupees(26_000)));
        let row = ReportRow::from_invoice(&inv);

        assert_eq!(row.amount, "Rs. 27,000.00");
        assert_eq!(row.status, "Pending");
        assert_eq!(row.type_label, "PO");
    }

    #[test]
    fn test_body_rows_equal_input() {
        for count in [1, 5, 60] {
            let invoices: Vec<Invoice> = (0..count).map(invoice).collect();
            let artifact = export_to_pdf_report_at(&invoices, generated_at()).unwrap();
            assert_eq!(artifact.row_count, count);

            let expected: Vec<String> = invoices.iter().map(|i| i.invoice_no.clone()).collect();
            assert_eq!(invoice_numbers(&drawn_text(&artifact.bytes)), expected);
        }
    }

    #[test]
    fn test_long_report_repeats_header_and_numbers_pages() {
        let invoices: Vec<Invoice> = (0..60).map(invoice).collect();
        let artifact = export_to_pdf_report_at(&invoices, generated_at()).unwrap();
        let pages = drawn_text(&artifact.bytes);

        let top = A4_LANDSCAPE.height - MARGIN - 5.0;
        let planned = plan_pages(60, rows_fitting(top - 18.0), rows_fitting(top));
        assert!(planned.len() > 1);
        assert_eq!(pages.len(), planned.len());

        let total = pages.len();
        for (idx, (page, range)) in pages.iter().zip(&planned).enumerate() {
            assert!(page.iter().any(|t| t == "Invoice No"), "no header on page {}", idx + 1);
            assert!(page.contains(&format!("Page {} of {}", idx + 1, total)));
            let rows = page.iter().filter(|t| t.starts_with("INV-")).count();
            assert_eq!(rows, range.len());
        }
        assert!(pages[0].iter().any(|t| t == REPORT_TITLE));
    }

    #[test]
    fn test_empty_report() {
        let artifact = export_to_pdf_report_at(&[], generated_at()).unwrap();
        assert_eq!(artifact.row_count, 0);
        assert_eq!(artifact.file_name, "invoices.pdf");

        let pages = drawn_text(&artifact.bytes);
        assert_eq!(pages.len(), 1);
        assert!(invoice_numbers(&pages).is_empty());
        assert!(pages[0].iter().any(|t| t == "No invoices to show."));
        assert!(pages[0].iter().any(|t| t == "Page 1 of 1"));
    }

    #[test]
    fn test_long_reports_paginate() {
        let first = rows_fitting(210.0 - MARGIN - 5.0 - 18.0);
        let rest = rows_fitting(210.0 - MARGIN - 5.0);
        assert!(first >= 1 && rest > first);

        let pages = plan_pages(60, first, rest);
        assert!(pages.len() > 1);
    }
}
