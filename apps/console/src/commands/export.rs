//! # Export Commands
//!
//! ```text
//! export spreadsheet ─┐                      ┌─► invoices.xlsx
//! export report ──────┼─ load + filters ─────┼─► invoices.pdf
//!                     │  (all pages)         │
//! export invoice KEY ─┴─ load + require ─────┴─► <invoiceNo>.pdf
//!                                                  │
//!                                    write_to(--out | [export].output_dir)
//! ```
//!
//! The collection exports take every invoice that passes the filters, not
//! just the current page. Generation runs on the calling thread.

use std::path::{Path, PathBuf};

use bizdash_core::types::Invoice;
use bizdash_export::{
    export_single_invoice_to_pdf, export_to_pdf_report, export_to_spreadsheet, ExportArtifact,
};
use tracing::info;

use super::{apply_filter_args, banner_notice, Output};
use crate::cli::FilterArgs;
use crate::error::{ConsoleResult, Notice};
use crate::state::AppContext;

pub async fn spreadsheet(
    ctx: &AppContext,
    filters: &FilterArgs,
    out: Option<PathBuf>,
) -> ConsoleResult<Output> {
    let (invoices, notices) = filtered(ctx, filters).await?;
    let artifact = export_to_spreadsheet(&invoices)?;
    Ok(written(ctx, artifact, out.as_deref())?.with_notices(notices))
}

pub async fn report(
    ctx: &AppContext,
    filters: &FilterArgs,
    out: Option<PathBuf>,
) -> ConsoleResult<Output> {
    let (invoices, notices) = filtered(ctx, filters).await?;
    let artifact = export_to_pdf_report(&invoices)?;
    Ok(written(ctx, artifact, out.as_deref())?.with_notices(notices))
}

pub async fn invoice(ctx: &AppContext, key: &str, out: Option<PathBuf>) -> ConsoleResult<Output> {
    ctx.load().await?;
    let invoice = ctx.store.with_store(|store| store.require(key).cloned())?;
    let artifact = export_single_invoice_to_pdf(&invoice)?;
    Ok(written(ctx, artifact, out.as_deref())?.with_notices(banner_notice(ctx)))
}

async fn filtered(
    ctx: &AppContext,
    filters: &FilterArgs,
) -> ConsoleResult<(Vec<Invoice>, Vec<Notice>)> {
    ctx.load().await?;
    let mut notices = apply_filter_args(ctx, filters)?;
    notices.extend(banner_notice(ctx));
    let invoices = ctx.store.with_store(|store| store.visible());
    Ok((invoices, notices))
}

fn written(ctx: &AppContext, artifact: ExportArtifact, out: Option<&Path>) -> ConsoleResult<Output> {
    let dir = out.unwrap_or(ctx.config.export.output_dir.as_path());
    let path = artifact.write_to(dir)?;

    info!(file = %path.display(), rows = artifact.row_count, "Export complete");
    Ok(Output::text(format!(
        "Wrote {} ({} row{})\n",
        path.display(),
        artifact.row_count,
        if artifact.row_count == 1 { "" } else { "s" }
    )))
}
