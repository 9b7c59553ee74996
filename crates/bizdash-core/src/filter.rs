//! # Filter/Paginate Engine
//!
//! Narrows the invoice collection to the visible subset and slices it into
//! pages.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  invoices                                                               │
//! │     │                                                                   │
//! │     ▼  (1) tab predicate      All │ Regular │ Gst │ Po │ Quotation      │
//! │     ▼  (2) search             invoice_no OR customer name, ignore case  │
//! │     ▼  (3) date range         inclusive, only when both bounds are set  │
//! │     │                                                                   │
//! │  filtered ──► paginate(page, page_size) ──► Page                        │
//! │                                                                         │
//! │  Every stage is stable: surviving invoices keep their input order.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pagination never clamps: a page past the end yields no items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::types::{parse_invoice_date, Invoice};
use crate::validation::{validate_page, validate_page_size, validate_search_query, ValidationResult};
use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Tab Filter
// =============================================================================

/// Structural partition of the invoice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TabFilter {
    #[default]
    All,
    /// No document-type flag set.
    Regular,
    Gst,
    Po,
    Quotation,
}

impl TabFilter {
    pub const ALL_TABS: [TabFilter; 5] = [
        TabFilter::All,
        TabFilter::Regular,
        TabFilter::Gst,
        TabFilter::Po,
        TabFilter::Quotation,
    ];

    /// Tab predicate.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        match self {
            TabFilter::All => true,
            TabFilter::Regular => invoice.is_regular(),
            TabFilter::Gst => invoice.gst,
            TabFilter::Po => invoice.po,
            TabFilter::Quotation => invoice.quotation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabFilter::All => "all",
            TabFilter::Regular => "regular",
            TabFilter::Gst => "gst",
            TabFilter::Po => "po",
            TabFilter::Quotation => "quotation",
        }
    }
}

impl fmt::Display for TabFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TabFilter::ALL_TABS
            .into_iter()
            .find(|tab| tab.as_str() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "tab".to_string(),
                allowed: TabFilter::ALL_TABS
                    .iter()
                    .map(|tab| tab.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive invoice-date window. Only active when both bounds are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateRange { start, end }
    }

    /// Both bounds set.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    pub fn is_active(&self) -> bool {
        self.bounds().is_some()
    }

    /// Range check for one invoice. Inactive ranges admit everything;
    /// active ranges reject invoices whose date does not parse.
    pub fn admits(&self, invoice: &Invoice) -> bool {
        match self.bounds() {
            None => true,
            Some((start, end)) => invoice
                .parsed_date()
                .is_some_and(|date| start <= date && date <= end),
        }
    }
}

/// Parses a filter bound: `DD/MM/YYYY` or ISO `YYYY-MM-DD`. Blank is `None`.
pub fn parse_filter_date(field: &str, raw: &str) -> ValidationResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    parse_invoice_date(raw)
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected DD/MM/YYYY or YYYY-MM-DD".to_string(),
        })
}

// =============================================================================
// Filter Criteria
// =============================================================================

/// Inputs of `apply_filters`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub tab: TabFilter,
    pub date_range: DateRange,
}

impl FilterCriteria {
    /// True when `invoice` survives all three stages.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.tab.matches(invoice)
            && matches_search(invoice, &self.search_term)
            && self.date_range.admits(invoice)
    }
}

/// Case-insensitive substring match on invoice number or customer name.
/// Blank terms match everything.
pub fn matches_search(invoice: &Invoice, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }

    let needle = term.to_lowercase();
    invoice.invoice_no.to_lowercase().contains(&needle)
        || invoice.customer.name.to_lowercase().contains(&needle)
}

/// Returns the invoices matching `criteria`, in input order.
///
/// Idempotent: filtering the output again with the same criteria changes
/// nothing.
pub fn apply_filters(invoices: &[Invoice], criteria: &FilterCriteria) -> Vec<Invoice> {
    invoices
        .iter()
        .filter(|invoice| criteria.matches(invoice))
        .cloned()
        .collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a filtered list.
///
/// `start_index..end_index` is the half-open range of `page_items` within the
/// filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page_items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.page_items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slices `items` into page `page` (1-based) of `page_size`.
///
/// `total_pages = ceil(len / page_size)` and `start_index = (page - 1) *
/// page_size` hold even when `page` is beyond the last page. Such a page is
/// empty and its `end_index` is the list length.
///
/// ## Errors
/// `page == 0` or a page size outside `1..=MAX_PAGE_SIZE`.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> CoreResult<Page<T>> {
    validate_page(page)?;
    validate_page_size(page_size)?;

    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let start_index = (page - 1).saturating_mul(page_size);
    let end_index = start_index.saturating_add(page_size).min(total_items);

    let page_items = if start_index < total_items {
        items[start_index..end_index].to_vec()
    } else {
        Vec::new()
    };

    Ok(Page {
        page_items,
        page,
        page_size,
        total_items,
        total_pages,
        start_index,
        end_index,
    })
}

// =============================================================================
// Filter State
// =============================================================================

/// Ephemeral view state: search, tab, date bounds and paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: String,
    pub tab: TabFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            search_term: String::new(),
            tab: TabFilter::All,
            start_date: None,
            end_date: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    /// Default state with the given page size.
    pub fn with_page_size(page_size: usize) -> Self {
        FilterState {
            page_size,
            ..FilterState::default()
        }
    }

    /// Sets the search term; rejects overlong terms.
    pub fn set_search(&mut self, term: &str) -> ValidationResult<()> {
        self.search_term = validate_search_query(term)?;
        Ok(())
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_term: self.search_term.clone(),
            tab: self.tab,
            date_range: DateRange::new(self.start_date, self.end_date),
        }
    }

    /// Filters then paginates with this state.
    pub fn view(&self, invoices: &[Invoice]) -> CoreResult<Page<Invoice>> {
        let filtered = apply_filters(invoices, &self.criteria());
        paginate(&filtered, self.page, self.page_size)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
