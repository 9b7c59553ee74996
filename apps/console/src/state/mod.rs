//! # State Module
//!
//! What a command handler gets to work with.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          AppContext                                     │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │ ClientConfig     │  │ StoreState       │  │ InvoiceSource        │  │
//! │  │ (config.toml +   │  │ Arc<Mutex<       │  │ Api(InvoiceApi)      │  │
//! │  │  BIZDASH_* env)  │  │   InvoiceStore>> │  │ File(--input path)   │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod source;
mod store;

pub use source::{read_json_file, InvoiceSource};
pub use store::StoreState;

use bizdash_client::{ClientConfig, TokenFile};
use bizdash_core::filter::FilterState;
use bizdash_core::store::InvoiceAction;
use tracing::{debug, warn};

use crate::error::ConsoleResult;

/// Everything one console invocation needs.
#[derive(Debug)]
pub struct AppContext {
    pub config: ClientConfig,
    pub store: StoreState,
    pub source: InvoiceSource,
}

impl AppContext {
    pub fn new(config: ClientConfig, source: InvoiceSource) -> Self {
        let store = StoreState::new(FilterState::with_page_size(config.view.page_size));
        AppContext {
            config,
            store,
            source,
        }
    }

    /// The persisted token store named by the config.
    pub fn token_file(&self) -> TokenFile {
        TokenFile::new(self.config.auth.token_file.clone())
    }

    /// Fetches the collection into the store.
    ///
    /// An API failure leaves an empty store with a banner; a bad `--input`
    /// file is an error.
    pub async fn load(&self) -> ConsoleResult<()> {
        let outcome = self.source.fetch().await?;
        let action = match outcome.notice {
            Some(notice) => {
                warn!(notice = %notice, "Showing empty invoice list");
                InvoiceAction::LoadFailed(notice)
            }
            None => {
                debug!(count = outcome.invoices.len(), "Invoices loaded");
                InvoiceAction::Loaded(outcome.invoices)
            }
        };
        self.store.dispatch(action)?;
        Ok(())
    }
}
