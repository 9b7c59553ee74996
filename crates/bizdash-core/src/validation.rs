//! # Validation Module
//!
//! Field validators used by the invoice draft builder and the filter engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Ingestion (ingest.rs)                                        │
//! │  └── Never rejects: coerces API JSON (numbers → 0, text → "")          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Draft submit (draft.rs)                                      │
//! │  └── THIS MODULE: every rule runs, all failures are collected          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST API                                                     │
//! │  └── Whatever the server enforces                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizdash_core::validation::{validate_invoice_date, validate_quantity};
//!
//! assert!(validate_invoice_date("15/03/2025").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::parse_invoice_date;
use crate::{MAX_ITEM_QUANTITY, MAX_PAGE_SIZE, MAX_SEARCH_LEN, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field (trimmed, 1..=200 chars).
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates an invoice number such as `INV-2025-002`.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, `-`, `/` and `_` only
pub fn validate_invoice_no(invoice_no: &str) -> ValidationResult<()> {
    let invoice_no = invoice_no.trim();

    if invoice_no.is_empty() {
        return Err(ValidationError::Required {
            field: "invoice number".to_string(),
        });
    }

    if invoice_no.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "invoice number".to_string(),
            max: 50,
        });
    }

    if !invoice_no
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '/' | '_'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "invoice number".to_string(),
            reason: "must contain only letters, numbers, '-', '/' and '_'".to_string(),
        });
    }

    Ok(())
}

/// Validates a `DD/MM/YYYY` date.
pub fn validate_invoice_date(date: &str) -> ValidationResult<()> {
    if date.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }

    parse_invoice_date(date)
        .map(|_| ())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: "expected DD/MM/YYYY".to_string(),
        })
}

/// Validates an Indian GSTIN: 15 characters, uppercase letters and digits,
/// starting with a two-digit state code.
///
/// ```rust
/// use bizdash_core::validation::validate_gstin;
///
/// assert!(validate_gstin("27AAPFU0939F1ZV").is_ok());
/// assert!(validate_gstin("27AAPFU0939F1Z").is_err());
/// ```
pub fn validate_gstin(gstin: &str) -> ValidationResult<()> {
    let gstin = gstin.trim();

    if gstin.is_empty() {
        return Err(ValidationError::Required {
            field: "GST number".to_string(),
        });
    }

    let well_formed = gstin.len() == 15
        && gstin
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        && gstin[..2].chars().all(|c| c.is_ascii_digit());

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "GST number".to_string(),
            reason: "must be a 15 character GSTIN".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional email: empty is fine, otherwise `local@domain.tld`.
pub fn validate_email(field: &str, email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number: 10 to 13 digits.
pub fn validate_phone(field: &str, phone: u64) -> ValidationResult<()> {
    if phone == 0 {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let digits = phone.to_string().len();
    if !(10..=13).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must have 10 to 13 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a 1-based page number.
pub fn validate_page(page: usize) -> ValidationResult<()> {
    if page == 0 {
        return Err(ValidationError::MustBePositive {
            field: "page".to_string(),
        });
    }
    Ok(())
}

/// Validates a page size (1..=MAX_PAGE_SIZE).
pub fn validate_page_size(page_size: usize) -> ValidationResult<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "page size".to_string(),
            min: 1,
            max: MAX_PAGE_SIZE as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
