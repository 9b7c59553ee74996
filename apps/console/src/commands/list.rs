//! # List Command
//!
//! Loads the collection, applies the flags, prints one page.

use std::fmt::Write as _;

use bizdash_core::filter::Page;
use bizdash_core::store::InvoiceAction;
use bizdash_core::totals::InvoiceTotals;
use bizdash_core::types::Invoice;
use tracing::debug;

use super::{apply_filter_args, banner_notice, Output};
use crate::cli::ListArgs;
use crate::error::ConsoleResult;
use crate::state::AppContext;

pub async fn list(ctx: &AppContext, args: &ListArgs) -> ConsoleResult<Output> {
    ctx.load().await?;
    let notices = apply_filter_args(ctx, &args.filters)?;

    if let Some(size) = args.page_size {
        ctx.store.dispatch(InvoiceAction::SetPageSize(size))?;
    }
    if let Some(page) = args.page {
        ctx.store.dispatch(InvoiceAction::SetPage(page))?;
    }

    let page = ctx.store.with_store(|store| store.current_page())?;
    debug!(
        page = page.page,
        total_items = page.total_items,
        total_pages = page.total_pages,
        "Listing page"
    );

    Ok(Output::text(render_page(&page))
        .with_notices(banner_notice(ctx))
        .with_notices(notices))
}

/// Plain-text table plus a position line.
pub fn render_page(page: &Page<Invoice>) -> String {
    if page.total_items == 0 {
        return "No invoices found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:<11} {:<24} {:<16} {:<10} {:>16}",
        "Invoice No", "Date", "Customer", "Type", "Status", "Total"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));

    for invoice in &page.page_items {
        let total = InvoiceTotals::for_invoice(invoice).total;
        let _ = writeln!(
            out,
            "{:<18} {:<11} {:<24} {:<16} {:<10} {:>16}",
            clip(&invoice.invoice_no, 18),
            clip(&invoice.date, 11),
            clip(&invoice.customer.name, 24),
            clip(&invoice.type_label(), 16),
            clip(&invoice.payment_status.label(), 10),
            total.format_inr(),
        );
    }

    if page.is_empty() {
        let _ = writeln!(
            out,
            "Page {} is past the last page ({}).",
            page.page, page.total_pages
        );
    } else {
        let _ = writeln!(
            out,
            "Showing {}-{} of {} (page {} of {})",
            page.start_index + 1,
            page.end_index,
            page.total_items,
            page.page,
            page.total_pages
        );
    }
    out
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FilterArgs;
    use crate::commands::testing::file_context;
    use bizdash_core::filter::TabFilter;

    #[tokio::test]
    async fn test_list_first_page() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());

        let output = list(
            &ctx,
            &ListArgs {
                page_size: Some(2),
                ..ListArgs::default()
            },
        )
        .await
        .unwrap();

        assert!(output.text.contains("INV-2025-001"));
        assert!(output.text.contains("INV-2025-002"));
        assert!(!output.text.contains("QT/2025/003"));
        assert!(output.text.contains("Showing 1-2 of 3 (page 1 of 2)"));
        assert!(output.notices.is_empty());
    }

    #[tokio::test]
    async fn test_list_quotation_tab() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());

        let output = list(
            &ctx,
            &ListArgs {
                filters: FilterArgs {
                    tab: Some(TabFilter::Quotation),
                    ..FilterArgs::default()
                },
                ..ListArgs::default()
            },
        )
        .await
        .unwrap();

        assert!(output.text.contains("QT/2025/003"));
        assert!(output.text.contains("Showing 1-1 of 1"));
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());

        let output = list(
            &ctx,
            &ListArgs {
                page: Some(9),
                ..ListArgs::default()
            },
        )
        .await
        .unwrap();

        assert!(output.text.contains("Page 9 is past the last page (1)."));
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());

        let result = list(
            &ctx,
            &ListArgs {
                page_size: Some(0),
                ..ListArgs::default()
            },
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a much longer name", 6), "a muc~");
    }
}
