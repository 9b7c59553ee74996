//! # Spreadsheet Exporter
//!
//! `invoices.xlsx`: one sheet named `Invoices`, a bold header row, then one
//! row per invoice in input order.
//!
//! ```text
//!  Invoice No │ Date │ Customer │ Phone │ Email │ Total Amount │ Payment Status │ Payment Type │ Type
//!  ───────────┼──────┼──────────┼───────┼───────┼──────────────┼────────────────┼──────────────┼─────
//!  INV-2025-2 │ 15/… │ John Doe │ 98765 │ j@d.in│     27000.00 │ Paid           │ UPI          │ PO
//! ```
//!
//! The amount column holds numbers (rupees), not text, so it sums.

use bizdash_core::display::phone_label;
use bizdash_core::totals::InvoiceTotals;
use bizdash_core::types::Invoice;
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::artifact::{ExportArtifact, XLSX_CONTENT_TYPE};
use crate::error::ExportResult;

pub const SPREADSHEET_FILE_NAME: &str = "invoices.xlsx";
pub const SHEET_NAME: &str = "Invoices";

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Rupees, written as a number with two decimals.
    Amount(f64),
}

/// A type that maps onto one worksheet row.
pub trait SheetRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<Cell>;
}

/// Spreadsheet projection of one invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRow {
    pub invoice_no: String,
    pub date: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub total_rupees: f64,
    pub payment_status: String,
    pub payment_type: String,
    pub type_label: String,
}

impl InvoiceRow {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        InvoiceRow {
            invoice_no: invoice.invoice_no.clone(),
            date: invoice.date.clone(),
            customer_name: invoice.customer.name.clone(),
            customer_phone: phone_label(invoice.customer.phone),
            customer_email: invoice.customer.email.clone(),
            total_rupees: InvoiceTotals::for_invoice(invoice).total.to_decimal_rupees(),
            payment_status: invoice.payment_status.label(),
            payment_type: invoice.payment_type.label(),
            type_label: invoice.type_label(),
        }
    }
}

impl SheetRow for InvoiceRow {
    fn headers() -> &'static [&'static str] {
        &[
            "Invoice No",
            "Date",
            "Customer Name",
            "Customer Phone",
            "Customer Email",
            "Total Amount",
            "Payment Status",
            "Payment Type",
            "Type",
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.invoice_no.clone()),
            Cell::Text(self.date.clone()),
            Cell::Text(self.customer_name.clone()),
            Cell::Text(self.customer_phone.clone()),
            Cell::Text(self.customer_email.clone()),
            Cell::Amount(self.total_rupees),
            Cell::Text(self.payment_status.clone()),
            Cell::Text(self.payment_type.clone()),
            Cell::Text(self.type_label.clone()),
        ]
    }
}

/// Projects invoices to rows. No skipping, no dedup, order kept.
pub fn spreadsheet_rows(invoices: &[Invoice]) -> Vec<InvoiceRow> {
    invoices.iter().map(InvoiceRow::from_invoice).collect()
}

/// Builds `invoices.xlsx`. Zero invoices give a header-only sheet.
pub fn export_to_spreadsheet(invoices: &[Invoice]) -> ExportResult<ExportArtifact> {
    let rows = spreadsheet_rows(invoices);
    let bytes = write_sheet(SHEET_NAME, &rows)?;

    debug!(rows = rows.len(), bytes = bytes.len(), "Spreadsheet built");

    Ok(ExportArtifact {
        file_name: SPREADSHEET_FILE_NAME.to_string(),
        content_type: XLSX_CONTENT_TYPE,
        bytes,
        row_count: rows.len(),
    })
}

/// Writes a single-sheet workbook and returns the .xlsx bytes.
pub fn write_sheet<T: SheetRow>(sheet_name: &str, rows: &[T]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("#,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in T::headers().iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        worksheet.set_column_width(col, column_width(header))?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (idx, row) in rows.iter().enumerate() {
        let row_no = (idx + 1) as u32;
        for (col, cell) in row.cells().into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row_no, col, &text)?;
                }
                Cell::Amount(value) => {
                    worksheet.write_number_with_format(row_no, col, value, &amount_format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_width(header: &str) -> f64 {
    (header.len() as f64 + 4.0).max(14.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdash_core::money::Money;
    use bizdash_core::types::{CustomerDetails, LineItem, PaymentStatus};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    /// One XML part of the generated workbook.
    fn xlsx_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    /// Rows actually present in the first worksheet, header included.
    fn sheet_row_count(bytes: &[u8]) -> usize {
        xlsx_part(bytes, "xl/worksheets/sheet1.xml")
            .matches("<row ")
            .count()
    }

    fn po_invoice() -> Invoice {
        Invoice {
            invoice_no: "INV-2025-002".to_string(),
            date: "15/03/2025".to_string(),
            customer: CustomerDetails {
                name: "John Doe".to_string(),
                phone: 9_876_543_210,
                ..CustomerDetails::default()
            },
            po: true,
            products: vec![
                LineItem::new("Laptop", 1, Money::from_rupees(25_000)),
                LineItem::new("Bag", 1, Money::from_rupees(2_000)),
            ],
            payment_status: PaymentStatus::Paid,
            ..Invoice::default()
        }
    }

    #[test]
    fn test_row_projection() {
        let row = InvoiceRow::from_invoice(&po_invoice());

        assert_eq!(row.invoice_no, "INV-2025-002");
        assert_eq!(row.customer_phone, "9876543210");
        assert!((row.total_rupees - 27_000.0).abs() < 1e-9);
        assert_eq!(row.payment_status, "Paid");
        assert_eq!(row.payment_type, "Cash");
        assert_eq!(row.type_label, "PO");
        assert_eq!(row.cells().len(), InvoiceRow::headers().len());
    }

    #[test]
    fn test_row_count_matches_input() {
        let invoices = vec![po_invoice(), po_invoice(), Invoice::default()];
        let artifact = export_to_spreadsheet(&invoices).unwrap();

        assert_eq!(artifact.row_count, 3);
        assert_eq!(artifact.file_name, "invoices.xlsx");
        assert_eq!(artifact.content_type, XLSX_CONTENT_TYPE);
        // header + one row per invoice
        assert_eq!(sheet_row_count(&artifact.bytes), 4);
    }

    #[test]
    fn test_workbook_contents() {
        let mut second = po_invoice();
        second.invoice_no = "INV-2025-003".to_string();
        let artifact = export_to_spreadsheet(&[po_invoice(), second]).unwrap();

        let workbook = xlsx_part(&artifact.bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Invoices""#));
        assert_eq!(workbook.matches("<sheet ").count(), 1);

        let strings = xlsx_part(&artifact.bytes, "xl/sharedStrings.xml");
        for text in ["Invoice No", "Total Amount", "INV-2025-002", "INV-2025-003", "John Doe"] {
            assert!(strings.contains(text), "missing {text}");
        }

        // totals are numeric cells, not text
        let sheet = xlsx_part(&artifact.bytes, "xl/worksheets/sheet1.xml");
        assert_eq!(sheet.matches("<v>27000</v>").count(), 2);
    }

    #[test]
    fn test_order_preserved() {
        let mut second = po_invoice();
        second.invoice_no = "INV-2025-003".to_string();
        let rows = spreadsheet_rows(&[po_invoice(), second, po_invoice()]);

        let numbers: Vec<&str> = rows.iter().map(|r| r.invoice_no.as_str()).collect();
        assert_eq!(numbers, ["INV-2025-002", "INV-2025-003", "INV-2025-002"]);
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let artifact = export_to_spreadsheet(&[]).unwrap();
        assert_eq!(artifact.row_count, 0);
        assert_eq!(sheet_row_count(&artifact.bytes), 1);
        assert!(xlsx_part(&artifact.bytes, "xl/workbook.xml").contains(r#"name="Invoices""#));
    }
}
