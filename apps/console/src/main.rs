//! # Bizdash Console Entry Point
//!
//! Setup lives in `lib.rs` for testability.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    bizdash_console::run().await
}
