//! # Console Commands
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs     ◄─── You are here (dispatch + shared filter handling)
//! ├── list.rs    ◄─── Filtered, paged table
//! ├── show.rs    ◄─── One invoice, formatted
//! ├── export.rs  ◄─── xlsx / report PDF / invoice PDF
//! ├── edit.rs    ◄─── Create / full-replace edit via InvoiceDraft
//! ├── delete.rs  ◄─── Optimistic delete
//! └── token.rs   ◄─── Token store
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  argv ──► Cli ──► execute(ctx, command)                                 │
//! │                      │                                                  │
//! │                      ├── ctx.load()      API or --input → store         │
//! │                      ├── dispatch(...)   flags become InvoiceActions    │
//! │                      └── handler         returns Output                 │
//! │                                                                         │
//! │  Output { text → stdout, notices → stderr }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod delete;
pub mod edit;
pub mod export;
pub mod list;
pub mod show;
pub mod token;

use bizdash_core::filter::{parse_filter_date, DateRange};
use bizdash_core::store::InvoiceAction;

use crate::cli::{Command, ExportCommand, FilterArgs, TokenCommand};
use crate::error::{ConsoleResult, Notice};
use crate::state::AppContext;

/// What a command produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub notices: Vec<Notice>,
}

impl Output {
    pub fn text(text: impl Into<String>) -> Self {
        Output {
            text: text.into(),
            notices: Vec::new(),
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn with_notices(mut self, notices: impl IntoIterator<Item = Notice>) -> Self {
        self.notices.extend(notices);
        self
    }
}

/// Runs one parsed command against the context.
pub async fn execute(ctx: &AppContext, command: Command) -> ConsoleResult<Output> {
    match command {
        Command::List(args) => list::list(ctx, &args).await,
        Command::Show { key } => show::show(ctx, &key).await,
        Command::Export(ExportCommand::Spreadsheet { filters, out }) => {
            export::spreadsheet(ctx, &filters, out).await
        }
        Command::Export(ExportCommand::Report { filters, out }) => {
            export::report(ctx, &filters, out).await
        }
        Command::Export(ExportCommand::Invoice { key, out }) => {
            export::invoice(ctx, &key, out).await
        }
        Command::Create(args) => edit::create(ctx, &args).await,
        Command::Edit(args) => edit::edit(ctx, &args).await,
        Command::Delete { id } => delete::delete(ctx, &id).await,
        Command::Token(TokenCommand::Set { token }) => token::set(ctx, &token),
        Command::Token(TokenCommand::Clear) => token::clear(ctx),
    }
}

/// Turns filter flags into store actions. Returns notices for flags that
/// were accepted but have no effect.
pub fn apply_filter_args(ctx: &AppContext, args: &FilterArgs) -> ConsoleResult<Vec<Notice>> {
    let mut notices = Vec::new();

    if let Some(term) = &args.search {
        ctx.store.dispatch(InvoiceAction::SetSearch(term.clone()))?;
    }
    if let Some(tab) = args.tab {
        ctx.store.dispatch(InvoiceAction::SetTab(tab))?;
    }

    let start = match &args.from {
        Some(raw) => parse_filter_date("from", raw)?,
        None => None,
    };
    let end = match &args.to {
        Some(raw) => parse_filter_date("to", raw)?,
        None => None,
    };
    let range = DateRange::new(start, end);
    if !range.is_active() && (start.is_some() || end.is_some()) {
        notices.push(Notice::warning(
            "Date filter needs both --from and --to; ignoring it",
        ));
    }
    ctx.store.dispatch(InvoiceAction::SetDateRange(range))?;

    Ok(notices)
}

/// The store's banner, if the last load failed.
pub fn banner_notice(ctx: &AppContext) -> Option<Notice> {
    ctx.store
        .with_store(|store| store.banner().map(Notice::warning))
}


#[cfg(test)]
mod tests {
    use super::*;
    use bizdash_core::filter::TabFilter;

    #[tokio::test]
    async fn test_filter_args_reach_store() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = testing::file_context(dir.path());
        ctx.load().await.unwrap();

        let notices = apply_filter_args(
            &ctx,
            &FilterArgs {
                search: Some("  JOHN ".into()),
                tab: Some(TabFilter::Gst),
                from: Some("01/03/2025".into()),
                to: Some("2025-03-31".into()),
            },
        )
        .unwrap();

        assert!(notices.is_empty());
        let visible = ctx.store.with_store(|s| s.visible());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].invoice_no, "INV-2025-002");
    }

    #[tokio::test]
    async fn test_half_open_date_range_warns() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = testing::file_context(dir.path());
        ctx.load().await.unwrap();

        let notices = apply_filter_args(
            &ctx,
            &FilterArgs {
                from: Some("01/03/2025".into()),
                ..FilterArgs::default()
            },
        )
        .unwrap();

        assert_eq!(notices.len(), 1);
        assert_eq!(ctx.store.with_store(|s| s.visible().len()), 3);
    }

    #[tokio::test]
    async fn test_bad_date_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = testing::file_context(dir.path());

        let result = apply_filter_args(
            &ctx,
            &FilterArgs {
                from: Some("31/02/2025".into()),
                to: Some("01/03/2025".into()),
                ..FilterArgs::default()
            },
        );
        assert!(result.is_err());
    }
}
