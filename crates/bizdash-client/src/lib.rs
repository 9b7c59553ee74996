//! # bizdash-client: REST Access for Bizdash
//!
//! Fetches and persists invoices through the backend API.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bizdash Client Flow                              │
//! │                                                                         │
//! │   apps/console                                                          │
//! │       │  ClientConfig::load(--config)                                   │
//! │       │  Arc<dyn CredentialProvider>                                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 bizdash-client (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐  ┌──────────────────┐  ┌──────────────────┐  │   │
//! │  │   │ config      │  │ credentials      │  │ api              │  │   │
//! │  │   │ toml + env  │  │ token providers  │  │ InvoiceApi CRUD  │  │   │
//! │  │   └─────────────┘  └──────────────────┘  └────────┬─────────┘  │   │
//! │  └───────────────────────────────────────────────────┼────────────┘   │
//! │                                                      ▼                  │
//! │                        HTTPS  {base}/invoices[/{id}]                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use bizdash_client::{ClientConfig, InvoiceApi, TokenFile};
//!
//! # async fn demo() -> bizdash_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let tokens = Arc::new(TokenFile::new(config.auth.token_file.clone()));
//! let api = InvoiceApi::new(&config, tokens)?;
//!
//! let outcome = api.list_or_fallback().await;
//! println!("{} invoices", outcome.invoices.len());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{InvoiceApi, ListOutcome, FETCH_FAILED_NOTICE};
pub use config::ClientConfig;
pub use credentials::{
    Anonymous, ChainedProvider, CredentialProvider, EnvToken, StaticToken, TokenFile,
};
pub use error::{ClientError, ClientResult};
