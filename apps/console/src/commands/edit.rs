//! # Create & Edit Commands
//!
//! The invoice form: build an [`InvoiceDraft`], validate every field in one
//! pass, save through the source, then upsert the stored copy.
//!
//! ```text
//!  --file JSON ──► InvoiceDraft ◄── --payment-status / --delivery-* flags
//!                      │ validate()
//!                      ├── Err(failures) ──► one VALIDATION_ERROR notice each
//!                      ▼
//!         create: POST /invoices        edit: PUT /invoices/{id} (full replace)
//!                      │
//!                      └──► InvoiceAction::Upserted(stored)
//! ```
//!
//! Edits are last-write-wins: there is no version check.

use std::path::Path;

use bizdash_core::draft::InvoiceDraft;
use bizdash_core::ingest::invoice_from_response;
use bizdash_core::store::InvoiceAction;
use bizdash_core::types::{DeliveryStatus, Invoice, PaymentStatus, PaymentType};
use bizdash_core::CoreError;
use tracing::{debug, info};

use super::Output;
use crate::cli::{CreateArgs, DraftFields, EditArgs};
use crate::error::{ConsoleError, ConsoleResult};
use crate::state::{read_json_file, AppContext};

pub async fn create(ctx: &AppContext, args: &CreateArgs) -> ConsoleResult<Output> {
    let mut invoice = read_invoice_file(&args.file).await?;
    // The server assigns identifiers.
    invoice.id = None;

    let invoice = submit(InvoiceDraft::from_invoice(invoice), &args.fields)?;
    let stored = ctx.source.create(&invoice).await?;
    info!(invoice_no = %stored.invoice_no, id = ?stored.id, "Invoice created");

    ctx.store.dispatch(InvoiceAction::Upserted(stored.clone()))?;
    Ok(Output::text(format!("Created {}\n", describe(&stored))))
}

pub async fn edit(ctx: &AppContext, args: &EditArgs) -> ConsoleResult<Output> {
    ctx.load().await?;
    let current = ctx
        .store
        .with_store(|store| store.require(&args.key).cloned())?;

    let base = match &args.file {
        Some(path) => {
            let mut replacement = read_invoice_file(path).await?;
            replacement.id = current.id.clone();
            replacement
        }
        None => current,
    };

    let invoice = submit(InvoiceDraft::from_invoice(base), &args.fields)?;
    let stored = ctx.source.update(&invoice).await?;
    info!(invoice_no = %stored.invoice_no, id = ?stored.id, "Invoice updated");

    ctx.store.dispatch(InvoiceAction::Upserted(stored.clone()))?;
    Ok(Output::text(format!("Updated {}\n", describe(&stored))))
}

/// Applies the flag overrides, then validates.
fn submit(draft: InvoiceDraft, fields: &DraftFields) -> ConsoleResult<Invoice> {
    apply_fields(draft, fields).validate().map_err(|errors| {
        debug!(failures = errors.len(), "Draft rejected");
        ConsoleError::Core(CoreError::InvalidInvoice(errors))
    })
}

fn apply_fields(mut draft: InvoiceDraft, fields: &DraftFields) -> InvoiceDraft {
    if let Some(status) = &fields.payment_status {
        draft = draft.payment_status(PaymentStatus::from(status.clone()));
    }
    if let Some(kind) = &fields.payment_type {
        draft = draft.payment_type(PaymentType::from(kind.clone()));
    }
    if let Some(status) = &fields.delivery_status {
        draft = draft.delivery_status(DeliveryStatus::parse_lenient(status));
    }
    if let Some(date) = &fields.delivery_date {
        draft = draft.delivery_date(date.clone());
    }
    draft
}

async fn read_invoice_file(path: &Path) -> ConsoleResult<Invoice> {
    let value = read_json_file(path).await?;
    if !value.is_object() {
        return Err(ConsoleError::Input {
            path: path.to_path_buf(),
            reason: "expected one invoice object".to_string(),
        });
    }
    Ok(invoice_from_response(&value))
}

fn describe(invoice: &Invoice) -> String {
    match &invoice.id {
        Some(id) => format!("{} ({})", invoice.invoice_no, id),
        None => invoice.invoice_no.clone(),
    }
}
