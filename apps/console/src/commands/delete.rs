//! # Delete Command
//!
//! Optimistic: the invoice leaves the local store first, then the API call
//! goes out. A failed call is logged and reported; the local removal stays.
//!
//! An id missing from the local list still goes to the server. If the server
//! does not remove it either, nothing was deleted and the command fails.

use bizdash_client::ClientError;
use bizdash_core::store::InvoiceAction;
use bizdash_core::CoreError;
use tracing::{debug, error, info};

use super::Output;
use crate::error::{ConsoleResult, Notice};
use crate::state::AppContext;

pub const DELETE_UNCONFIRMED: &str =
    "Removed locally, but the server did not confirm the delete. Refresh to check.";

pub async fn delete(ctx: &AppContext, id: &str) -> ConsoleResult<Output> {
    ctx.load().await?;

    let removed_locally = match ctx.store.dispatch(InvoiceAction::Removed(id.to_string())) {
        Ok(()) => {
            debug!(id, "Removed from local list");
            true
        }
        // Not in the (possibly stale or empty) list; the server decides.
        Err(CoreError::InvoiceNotFound(_)) => {
            debug!(id, "Not in local list");
            false
        }
        Err(other) => return Err(other.into()),
    };

    if !removed_locally && ctx.source.is_local() {
        return Err(CoreError::InvoiceNotFound(id.to_string()).into());
    }

    match ctx.source.delete(id).await {
        Ok(()) => {
            info!(id, "Invoice deleted");
            Ok(Output::text(format!("Deleted {}\n", id)))
        }
        Err(e) if removed_locally => {
            error!(id, error = %e, "Delete failed");
            Ok(Output::text(format!("Deleted {} locally\n", id))
                .with_notice(Notice::warning(DELETE_UNCONFIRMED)))
        }
        Err(ClientError::NotFound(_)) => {
            debug!(id, "Unknown locally and at the server");
            Err(CoreError::InvoiceNotFound(id.to_string()).into())
        }
        Err(e) => {
            error!(id, error = %e, "Delete failed");
            Err(e.into())
        }
    }
}
