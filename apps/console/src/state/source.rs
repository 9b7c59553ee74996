//! # Invoice Source
//!
//! Where the collection comes from: the REST API, or a JSON file given with
//! `--input` (same shapes the API returns).

use std::path::{Path, PathBuf};

use bizdash_client::{ClientResult, InvoiceApi, ListOutcome};
use bizdash_core::ingest::invoices_from_response;
use bizdash_core::types::Invoice;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ConsoleError, ConsoleResult};

#[derive(Debug)]
pub enum InvoiceSource {
    Api(InvoiceApi),
    File(PathBuf),
}

impl InvoiceSource {
    /// Lists invoices. API failures come back as an empty outcome with a
    /// notice; file failures are errors.
    pub async fn fetch(&self) -> ConsoleResult<ListOutcome> {
        match self {
            InvoiceSource::Api(api) => Ok(api.list_or_fallback().await),
            InvoiceSource::File(path) => {
                let value = read_json_file(path).await?;
                let invoices = invoices_from_response(&value);
                debug!(path = %path.display(), count = invoices.len(), "Invoices read from file");
                Ok(ListOutcome {
                    invoices,
                    notice: None,
                })
            }
        }
    }

    /// True when changes never leave this process.
    pub fn is_local(&self) -> bool {
        matches!(self, InvoiceSource::File(_))
    }

    /// Saves a new invoice and returns the stored copy.
    pub async fn create(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        match self {
            InvoiceSource::Api(api) => api.create(invoice).await,
            InvoiceSource::File(path) => {
                info!(invoice_no = %invoice.invoice_no, path = %path.display(), "Input file is read-only; created locally only");
                Ok(invoice.clone())
            }
        }
    }

    /// Full replace of a stored invoice.
    pub async fn update(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        match self {
            InvoiceSource::Api(api) => api.update(invoice).await,
            InvoiceSource::File(path) => {
                info!(invoice_no = %invoice.invoice_no, path = %path.display(), "Input file is read-only; updated locally only");
                Ok(invoice.clone())
            }
        }
    }

    /// Deletes remotely. A file source has nothing to delete from.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        match self {
            InvoiceSource::Api(api) => api.delete(id).await,
            InvoiceSource::File(path) => {
                info!(id, path = %path.display(), "Input file is read-only; removed locally only");
                Ok(())
            }
        }
    }
}

/// Reads and parses a JSON file given on the command line.
pub async fn read_json_file(path: &Path) -> ConsoleResult<Value> {
    let input_error = |reason: String| ConsoleError::Input {
        path: path.to_path_buf(),
        reason,
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| input_error(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| input_error(e.to_string()))
}
