//! # Token Commands
//!
//! `token set` / `token clear` against the JSON token file named by
//! `[auth].token_file`.

use tracing::info;

use super::Output;
use crate::error::ConsoleResult;
use crate::state::AppContext;

pub fn set(ctx: &AppContext, token: &str) -> ConsoleResult<Output> {
    let store = ctx.token_file();
    store.save(token)?;
    info!(path = %store.path().display(), "API token stored");
    Ok(Output::text(format!("Token saved to {}\n", store.path().display())))
}

pub fn clear(ctx: &AppContext) -> ConsoleResult<Output> {
    let store = ctx.token_file();
    store.clear()?;
    info!(path = %store.path().display(), "API token cleared");
    Ok(Output::text("Token cleared\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::file_context;
    use bizdash_client::CredentialProvider;

    #[test]
    fn test_set_then_clear() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());

        set(&ctx, "abc123").unwrap();
        assert_eq!(ctx.token_file().token().as_deref(), Some("abc123"));

        clear(&ctx).unwrap();
        assert_eq!(ctx.token_file().token(), None);
    }

    #[test]
    fn test_blank_token_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = file_context(dir.path());
        assert!(set(&ctx, " ").is_err());
    }
}
