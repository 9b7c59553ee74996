//! # Bizdash Console Library
//!
//! Command-line front for the invoice core. The binary in `main.rs` only
//! calls [`run`].
//!
//! ## Module Organization
//! ```text
//! bizdash_console/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── AppContext
//! │   ├── store.rs    ◄─── Arc<Mutex<InvoiceStore>>
//! │   └── source.rs   ◄─── API or --input file
//! ├── commands/       ◄─── list, show, export, create/edit, delete, token
//! └── error.rs        ◄─── ConsoleError → Notice
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use std::process::ExitCode;
use std::sync::Arc;

use bizdash_client::{ChainedProvider, ClientConfig, EnvToken, InvoiceApi, TokenFile};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::ConsoleResult;
use state::{AppContext, InvoiceSource};

/// Runs the console.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Parse arguments ──────────────────────────────────────────────────► │
/// │  2. Initialize Logging (RUST_LOG or info,bizdash=debug,reqwest=warn) ─► │
/// │  3. Load ClientConfig ────────────────────────────────────────────────► │
/// │     • --config given: errors are fatal                                  │
/// │     • otherwise: fall back to defaults with a warning                   │
/// │  4. Pick the source ──────────────────────────────────────────────────► │
/// │     • --input FILE, or                                                  │
/// │     • InvoiceApi with BIZDASH_TOKEN, then the token file                │
/// │  5. Execute the command; text → stdout, notices → stderr ─────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting bizdash console");

    match execute(cli).await {
        Ok(output) => {
            print!("{}", output.text);
            for notice in &output.notices {
                eprintln!("{}", notice);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!(error = ?err, "Command failed");
            for notice in err.notices() {
                eprintln!("{}", notice);
            }
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> ConsoleResult<commands::Output> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load(Some(path.clone()))?,
        None => ClientConfig::load_or_default(None),
    };
    let ctx = AppContext::new(config.clone(), build_source(&config, cli.input)?);
    commands::execute(&ctx, cli.command).await
}

fn build_source(
    config: &ClientConfig,
    input: Option<std::path::PathBuf>,
) -> ConsoleResult<InvoiceSource> {
    if let Some(path) = input {
        debug!(path = %path.display(), "Using input file");
        return Ok(InvoiceSource::File(path));
    }

    let credentials = ChainedProvider::new()
        .with(EnvToken::default())
        .with(TokenFile::new(config.auth.token_file.clone()));
    let api = InvoiceApi::new(config, Arc::new(credentials))?;
    debug!(base_url = config.base_url(), "Using API");
    Ok(InvoiceSource::Api(api))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bizdash=trace` - Show trace for bizdash crates only
/// - Default: `info,bizdash=debug,reqwest=warn`
///
/// Logs go to stderr so stdout stays clean for command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bizdash=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
