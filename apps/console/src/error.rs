//! # Console Error Type
//!
//! Unified error type for command handlers and the notices shown to the user.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Command handler                                                        │
//! │  Result<T, ConsoleError>                                                │
//! │         │                                                               │
//! │         ├── CoreError::InvoiceNotFound ──────► NOT_FOUND                │
//! │         ├── CoreError::Validation ───────────► VALIDATION_ERROR         │
//! │         ├── CoreError::InvalidInvoice ───────► VALIDATION_ERROR × n     │
//! │         ├── ClientError (401/403) ───────────► UNAUTHORIZED             │
//! │         ├── ClientError (transport/status) ──► NETWORK                  │
//! │         ├── ClientError (config) ────────────► CONFIG                   │
//! │         ├── ExportError ─► log cause ────────► EXPORT_FAILED (generic)  │
//! │         └── anything else ───────────────────► INTERNAL                 │
//! │                                                                         │
//! │  Notice { level, code, message } ──► stderr                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::path::PathBuf;

use bizdash_client::ClientError;
use bizdash_core::{CoreError, ValidationError};
use bizdash_export::ExportError;
use serde::Serialize;
use thiserror::Error;

/// What the user sees when an export fails. The cause goes to the log.
pub const EXPORT_FAILED_MESSAGE: &str = "Export failed. Please try again.";

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// The `--input` file could not be used.
    #[error("Cannot read invoices from {path}: {reason}")]
    Input { path: PathBuf, reason: String },
}

impl ConsoleError {
    /// Everything the user should see for this error. A rejected draft
    /// yields one notice per failed field.
    pub fn notices(&self) -> Vec<Notice> {
        match self {
            ConsoleError::Core(CoreError::InvalidInvoice(errors)) => errors
                .iter()
                .map(|e| Notice::error(ErrorCode::ValidationError, e.to_string()))
                .collect(),
            other => vec![Notice::from(other)],
        }
    }
}

impl From<ValidationError> for ConsoleError {
    fn from(err: ValidationError) -> Self {
        ConsoleError::Core(CoreError::Validation(err))
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

// =============================================================================
// Notice
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    Unauthorized,
    Network,
    ExportFailed,
    Config,
    Internal,
}

/// A transient message for the user: the console's toast/banner.
///
/// ```json
/// { "level": "error", "code": "NOT_FOUND", "message": "Invoice not found: INV-9" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: Option<ErrorCode>,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            code: None,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            code: None,
            message: message.into(),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            code: Some(code),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Converts command errors to notices.
impl From<&ConsoleError> for Notice {
    fn from(err: &ConsoleError) -> Self {
        match err {
            ConsoleError::Core(CoreError::InvoiceNotFound(key)) => {
                Notice::error(ErrorCode::NotFound, format!("Invoice not found: {}", key))
            }
            ConsoleError::Core(other) => Notice::error(ErrorCode::ValidationError, other.to_string()),
            ConsoleError::Client(ClientError::NotFound(key)) => {
                Notice::error(ErrorCode::NotFound, format!("Invoice not found: {}", key))
            }
            ConsoleError::Client(e) if e.is_config_error() => {
                Notice::error(ErrorCode::Config, e.to_string())
            }
            ConsoleError::Client(e) if e.is_auth_error() => {
                Notice::error(ErrorCode::Unauthorized, e.to_string())
            }
            ConsoleError::Client(ClientError::MissingId(_)) => {
                Notice::error(ErrorCode::ValidationError, err.to_string())
            }
            ConsoleError::Client(ClientError::TokenStore(_)) => {
                Notice::error(ErrorCode::Internal, err.to_string())
            }
            ConsoleError::Client(e) => Notice::error(ErrorCode::Network, e.to_string()),
            ConsoleError::Export(e) => {
                tracing::error!(error = %e, "Export failed");
                Notice::error(ErrorCode::ExportFailed, EXPORT_FAILED_MESSAGE)
            }
            ConsoleError::Input { .. } => Notice::error(ErrorCode::Config, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_code() {
        let err = ConsoleError::from(CoreError::InvoiceNotFound("INV-9".into()));
        let notice = Notice::from(&err);
        assert_eq!(notice.code, Some(ErrorCode::NotFound));
        assert_eq!(notice.message, "Invoice not found: INV-9");
    }

    #[test]
    fn test_export_failure_is_generic() {
        let err = ConsoleError::from(ExportError::OutputDir(PathBuf::from("/nope")));
        let notice = Notice::from(&err);
        assert_eq!(notice.code, Some(ErrorCode::ExportFailed));
        assert_eq!(notice.message, EXPORT_FAILED_MESSAGE);
        assert!(!notice.message.contains("/nope"));
    }

    #[test]
    fn test_client_categories() {
        let network = ConsoleError::from(ClientError::Timeout(30));
        assert_eq!(Notice::from(&network).code, Some(ErrorCode::Network));

        let config = ConsoleError::from(ClientError::InvalidUrl("ftp://x".into()));
        assert_eq!(Notice::from(&config).code, Some(ErrorCode::Config));
    }

    #[test]
    fn test_validation_code() {
        let err = ConsoleError::from(ValidationError::Required {
            field: "invoice number".into(),
        });
        assert_eq!(Notice::from(&err).code, Some(ErrorCode::ValidationError));
    }

    #[test]
    fn test_auth_failures_have_their_own_code() {
        let err = ConsoleError::from(ClientError::Unauthorized { status: 401 });
        let notice = Notice::from(&err);
        assert_eq!(notice.code, Some(ErrorCode::Unauthorized));
        assert!(notice.message.contains("token set"));
    }

    #[test]
    fn test_rejected_draft_lists_every_field() {
        let err = ConsoleError::from(CoreError::InvalidInvoice(vec![
            ValidationError::Required {
                field: "customer name".into(),
            },
            ValidationError::Required {
                field: "products".into(),
            },
        ]));

        let notices = err.notices();
        assert_eq!(notices.len(), 2);
        assert!(notices
            .iter()
            .all(|n| n.code == Some(ErrorCode::ValidationError)));
        assert_eq!(notices[1].message, "products is required");

        // other errors stay a single notice
        let single = ConsoleError::from(CoreError::InvoiceNotFound("x".into()));
        assert_eq!(single.notices(), vec![Notice::from(&single)]);
    }

    #[test]
    fn test_notice_serialization() {
        let json = serde_json::to_value(Notice::error(ErrorCode::NotFound, "gone")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["level"], "error");
    }
}
