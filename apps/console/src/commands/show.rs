//! # Show Command
//!
//! Prints one invoice through the document formatter.

use std::fmt::Write as _;

use bizdash_core::display::{format_invoice_for_display, DisplayModel};

use super::{banner_notice, Output};
use crate::error::ConsoleResult;
use crate::state::AppContext;

pub async fn show(ctx: &AppContext, key: &str) -> ConsoleResult<Output> {
    ctx.load().await?;
    let model = ctx
        .store
        .with_store(|store| store.require(key).map(format_invoice_for_display))?;

    Ok(Output::text(render_model(&model)).with_notices(banner_notice(ctx)))
}

pub fn render_model(model: &DisplayModel) -> String {
    let invoice = &model.invoice;
    let mut out = String::new();

    let _ = writeln!(out, "{}  ({})", invoice.invoice_no, model.type_label);
    let _ = writeln!(out, "Date: {}", model.date_label);
    let _ = writeln!(out);

    let _ = writeln!(out, "Bill to: {}", invoice.customer.name);
    for line in [
        &model.customer_phone_label,
        &invoice.customer.email,
        &invoice.customer.address,
    ] {
        if !line.is_empty() {
            let _ = writeln!(out, "         {}", line);
        }
    }

    if let Some(gst) = &model.gst_block {
        let _ = writeln!(out);
        let _ = writeln!(out, "GST: {} ({})", gst.name, gst.number);
        for line in [&gst.phone, &gst.email, &gst.address] {
            if !line.is_empty() {
                let _ = writeln!(out, "     {}", line);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>3}  {:<28} {:<16} {:>5} {:>14} {:>14}",
        "#", "Product", "Serial No", "Qty", "Price", "Amount"
    );
    for line in &model.lines {
        let _ = writeln!(
            out,
            "{:>3}  {:<28} {:<16} {:>5} {:>14} {:>14}",
            line.position,
            line.product_name,
            line.serial_no,
            line.quantity,
            line.unit_price_label,
            line.line_total_label
        );
    }
    if model.lines.is_empty() {
        let _ = writeln!(out, "     (no items)");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:>68} {:>14}", "Subtotal", model.subtotal_label);
    if let Some(gst) = &model.gst_block {
        let _ = writeln!(
            out,
            "{:>68} {:>14}",
            format!("GST @ {}", gst.rate_label),
            model.gst_label
        );
    }
    let _ = writeln!(out, "{:>68} {:>14}", "Grand Total", model.total_label);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Payment: {} via {}",
        model.payment_status_label, model.payment_type_label
    );
    let delivery = if model.delivery_date_label.is_empty() {
        model.delivery_status_label.clone()
    } else {
        format!("{} on {}", model.delivery_status_label, model.delivery_date_label)
    };
    let _ = writeln!(out, "Delivery: {}", delivery);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::file_context;
    use crate::error::ConsoleError;
    use bizdash_core::CoreError;

    #[tokio::test]
    async fn test_show_gst_invoice_by_number() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());

        let output = show(&ctx, "INV-2025-002").await.unwrap();

        assert!(output.text.contains("INV-2025-002  (GST)"));
        assert!(output.text.contains("Date: 15 Mar 2025"));
        assert!(output.text.contains("GST: Doe Traders (27AAPFU0939F1ZV)"));
        assert!(output.text.contains("GST @ 18%"));
        assert!(output.text.contains("Laptop"));
    }

    #[tokio::test]
    async fn test_show_regular_invoice_by_id_has_no_gst_line() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());

        let output = show(&ctx, "a1").await.unwrap();

        assert!(output.text.contains("INV-2025-001"));
        assert!(!output.text.contains("GST @"));
        assert!(output.text.contains("Grand Total"));
    }

    #[tokio::test]
    async fn test_show_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());

        let err = show(&ctx, "INV-404").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Core(CoreError::InvoiceNotFound(_))));
    }
}
