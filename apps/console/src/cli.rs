//! # Command Line
//!
//! ```text
//! bizdash [--config PATH] [--input FILE] <command>
//!
//!   list   [--search S] [--tab T] [--from D] [--to D] [--page N] [--page-size N]
//!   show   <id|invoiceNo>
//!   export spreadsheet|report [filters] [--out DIR]
//!   export invoice <id|invoiceNo> [--out DIR]
//!   create --file FILE [field flags]
//!   edit   <id|invoiceNo> [--file FILE] [field flags]
//!   delete <id>
//!   token  set <TOKEN> | clear
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bizdash_core::filter::TabFilter;

#[derive(Parser, Debug)]
#[command(name = "bizdash", version, about = "Invoices: list, inspect, edit, export")]
pub struct Cli {
    /// Config file (default: platform config dir/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read invoices from a JSON file instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List invoices, filtered and paged
    List(ListArgs),

    /// Print one invoice
    Show {
        /// Identifier or invoice number
        key: String,
    },

    /// Write invoices to a file
    #[command(subcommand)]
    Export(ExportCommand),

    /// Create an invoice from a JSON file
    Create(CreateArgs),

    /// Replace an invoice with an edited copy
    Edit(EditArgs),

    /// Delete an invoice by identifier
    Delete { id: String },

    /// Manage the stored API token
    #[command(subcommand)]
    Token(TokenCommand),
}

/// Filters shared by `list` and the collection exports.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive match on invoice number or customer name
    #[arg(long, short)]
    pub search: Option<String>,

    /// all | regular | gst | po | quotation
    #[arg(long, short)]
    pub tab: Option<TabFilter>,

    /// Start date, DD/MM/YYYY or YYYY-MM-DD (needs --to)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// End date, DD/MM/YYYY or YYYY-MM-DD (needs --from)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// 1-based page number
    #[arg(long, short)]
    pub page: Option<usize>,

    /// Rows per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Field overrides applied on top of the draft before validation.
#[derive(Args, Debug, Clone, Default)]
pub struct DraftFields {
    /// paid | pending | partial (other text is kept as given)
    #[arg(long, value_name = "STATUS")]
    pub payment_status: Option<String>,

    /// cash | card | upi | bank (other text is kept as given)
    #[arg(long, value_name = "TYPE")]
    pub payment_type: Option<String>,

    /// Delivery status
    #[arg(
        long,
        value_name = "STATUS",
        value_parser = ["pending", "processing", "shipped", "in_transit", "delivered", "cancelled"]
    )]
    pub delivery_status: Option<String>,

    /// DD/MM/YYYY
    #[arg(long, value_name = "DATE")]
    pub delivery_date: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Invoice JSON in the shape the API stores
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub fields: DraftFields,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Identifier or invoice number
    pub key: String,

    /// Replacement invoice JSON; without it the stored invoice is edited
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub fields: DraftFields,
}

#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// invoices.xlsx of the filtered list
    Spreadsheet {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// invoices.pdf of the filtered list
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// <invoiceNo>.pdf for one invoice
    Invoice {
        key: String,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Save a bearer token
    Set { token: String },
    /// Remove the saved token
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_filters() {
        let cli = Cli::try_parse_from([
            "bizdash", "--input", "inv.json", "list", "--tab", "GST", "--search", "john", "--page",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("inv.json")));
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.filters.tab, Some(TabFilter::Gst));
                assert_eq!(args.filters.search.as_deref(), Some("john"));
                assert_eq!(args.page, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_tab_rejected() {
        assert!(Cli::try_parse_from(["bizdash", "list", "--tab", "drafts"]).is_err());
    }

    #[test]
    fn test_parse_edit_with_overrides() {
        let cli = Cli::try_parse_from([
            "bizdash",
            "edit",
            "INV-2025-002",
            "--payment-status",
            "paid",
            "--delivery-status",
            "in_transit",
        ])
        .unwrap();

        match cli.command {
            Command::Edit(args) => {
                assert_eq!(args.key, "INV-2025-002");
                assert!(args.file.is_none());
                assert_eq!(args.fields.payment_status.as_deref(), Some("paid"));
                assert_eq!(args.fields.delivery_status.as_deref(), Some("in_transit"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_create_needs_file() {
        assert!(Cli::try_parse_from(["bizdash", "create"]).is_err());
        assert!(Cli::try_parse_from(["bizdash", "create", "--file", "draft.json"]).is_ok());
        assert!(Cli::try_parse_from([
            "bizdash", "create", "--file", "d.json", "--delivery-status", "lost"
        ])
        .is_err());
    }

    #[test]
    fn test_parse_export_invoice() {
        let cli =
            Cli::try_parse_from(["bizdash", "export", "invoice", "INV-7", "--out", "/tmp"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Export(ExportCommand::Invoice { ref key, .. }) if key == "INV-7"
        ));
    }
}
