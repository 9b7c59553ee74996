//! # Invoice Store
//!
//! The single owned invoice collection plus its view state. Every change goes
//! through [`InvoiceStore::dispatch`] with an explicit [`InvoiceAction`];
//! views read through the selectors and may subscribe to dispatched actions.
//!
//! ```text
//!            dispatch(action)
//!  command ───────────────────►  InvoiceStore  ──► listeners(&action)
//!                                 │ invoices
//!                                 │ filter: FilterState
//!                                 │ banner: Option<String>
//!                                 ▼
//!                  visible() / current_page() / find(key)
//! ```
//!
//! Removal is optimistic and final: a failed delete at the API does not put
//! the invoice back.

use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::filter::{apply_filters, paginate, DateRange, FilterState, Page, TabFilter};
use crate::types::Invoice;
use crate::validation::{validate_page, validate_page_size, validate_search_query};

/// Everything that can change the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceAction {
    /// Replace the collection with a fresh fetch. Clears the banner.
    Loaded(Vec<Invoice>),
    /// Fetch failed: empty collection plus an inline banner.
    LoadFailed(String),
    /// Insert or full-replace by identifier.
    Upserted(Invoice),
    /// Drop the invoice with this identifier.
    Removed(String),
    SetSearch(String),
    SetTab(TabFilter),
    SetDateRange(DateRange),
    SetPage(usize),
    SetPageSize(usize),
    DismissBanner,
}

impl InvoiceAction {
    /// Short name for logs; never includes invoice data.
    pub fn kind(&self) -> &'static str {
        match self {
            InvoiceAction::Loaded(_) => "loaded",
            InvoiceAction::LoadFailed(_) => "load_failed",
            InvoiceAction::Upserted(_) => "upserted",
            InvoiceAction::Removed(_) => "removed",
            InvoiceAction::SetSearch(_) => "set_search",
            InvoiceAction::SetTab(_) => "set_tab",
            InvoiceAction::SetDateRange(_) => "set_date_range",
            InvoiceAction::SetPage(_) => "set_page",
            InvoiceAction::SetPageSize(_) => "set_page_size",
            InvoiceAction::DismissBanner => "dismiss_banner",
        }
    }
}

type Listener = Box<dyn Fn(&InvoiceAction) + Send + 'static>;

/// Owned invoice collection with filter state.
pub struct InvoiceStore {
    invoices: Vec<Invoice>,
    filter: FilterState,
    banner: Option<String>,
    listeners: Vec<Listener>,
}

impl Default for InvoiceStore {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl fmt::Debug for InvoiceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvoiceStore")
            .field("invoices", &self.invoices.len())
            .field("filter", &self.filter)
            .field("banner", &self.banner)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl InvoiceStore {
    pub fn new(filter: FilterState) -> Self {
        InvoiceStore {
            invoices: Vec::new(),
            filter,
            banner: None,
            listeners: Vec::new(),
        }
    }

    /// Registers a callback run after every successful dispatch.
    pub fn subscribe(&mut self, listener: impl Fn(&InvoiceAction) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Applies one action.
    ///
    /// ## Errors
    /// - `Validation` for a bad search term, page or page size (state unchanged)
    /// - `InvoiceNotFound` when removing an unknown identifier
    pub fn dispatch(&mut self, action: InvoiceAction) -> CoreResult<()> {
        match &action {
            InvoiceAction::Loaded(invoices) => {
                self.invoices = invoices.clone();
                self.banner = None;
            }
            InvoiceAction::LoadFailed(message) => {
                self.invoices.clear();
                self.banner = Some(message.clone());
            }
            InvoiceAction::Upserted(invoice) => self.upsert(invoice.clone()),
            InvoiceAction::Removed(id) => {
                let before = self.invoices.len();
                self.invoices.retain(|inv| inv.id.as_deref() != Some(id.as_str()));
                if self.invoices.len() == before {
                    return Err(CoreError::InvoiceNotFound(id.clone()));
                }
            }
            InvoiceAction::SetSearch(term) => {
                self.filter.search_term = validate_search_query(term)?;
            }
            InvoiceAction::SetTab(tab) => self.filter.tab = *tab,
            InvoiceAction::SetDateRange(range) => {
                self.filter.start_date = range.start;
                self.filter.end_date = range.end;
            }
            InvoiceAction::SetPage(page) => {
                validate_page(*page)?;
                self.filter.page = *page;
            }
            InvoiceAction::SetPageSize(size) => {
                validate_page_size(*size)?;
                self.filter.page_size = *size;
            }
            InvoiceAction::DismissBanner => self.banner = None,
        }

        for listener in &self.listeners {
            listener(&action);
        }
        Ok(())
    }

    fn upsert(&mut self, invoice: Invoice) {
        let slot = invoice.id.as_deref().and_then(|id| {
            self.invoices
                .iter()
                .position(|existing| existing.id.as_deref() == Some(id))
        });

        match slot {
            Some(idx) => self.invoices[idx] = invoice,
            None => self.invoices.push(invoice),
        }
    }

    // -------------------------------------------------------------------------
    // Selectors
    // -------------------------------------------------------------------------

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Looks up by identifier or invoice number.
    pub fn find(&self, key: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|inv| inv.matches_key(key))
    }

    /// Looks up by identifier or invoice number, as an error when absent.
    pub fn require(&self, key: &str) -> CoreResult<&Invoice> {
        self.find(key)
            .ok_or_else(|| CoreError::InvoiceNotFound(key.to_string()))
    }

    /// All invoices passing the current filters.
    pub fn visible(&self) -> Vec<Invoice> {
        apply_filters(&self.invoices, &self.filter.criteria())
    }

    /// The current page of the visible invoices.
    pub fn current_page(&self) -> CoreResult<Page<Invoice>> {
        paginate(&self.visible(), self.filter.page, self.filter.page_size)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn stored(id: &str, no: &str) -> Invoice {
        Invoice {
            id: Some(id.to_string()),
            invoice_no: no.to_string(),
            date: "15/03/2025".to_string(),
            ..Invoice::default()
        }
    }

    fn loaded(count: usize) -> InvoiceStore {
        let mut store = InvoiceStore::default();
        let invoices = (1..=count)
            .map(|n| stored(&format!("id-{n}"), &format!("INV-{n:03}")))
            .collect();
        store.dispatch(InvoiceAction::Loaded(invoices)).unwrap();
        store
    }

    #[test]
    fn test_load_and_page() {
        let mut store = loaded(23);
        store.dispatch(InvoiceAction::SetPage(3)).unwrap();

        let page = store.current_page().unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.start_index, 20);
        assert_eq!(page.page_items.len(), 3);
    }

    #[test]
    fn test_load_failed_falls_back_to_empty_with_banner() {
        let mut store = loaded(3);
        store
            .dispatch(InvoiceAction::LoadFailed("Could not load invoices".to_string()))
            .unwrap();

        assert!(store.invoices().is_empty());
        assert_eq!(store.banner(), Some("Could not load invoices"));

        store.dispatch(InvoiceAction::Loaded(vec![stored("a", "INV-1")])).unwrap();
        assert!(store.banner().is_none());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = loaded(2);

        let mut edited = stored("id-2", "INV-002");
        edited.customer.name = "Jane Roe".to_string();
        store.dispatch(InvoiceAction::Upserted(edited)).unwrap();
        assert_eq!(store.invoices().len(), 2);
        assert_eq!(store.find("id-2").unwrap().customer.name, "Jane Roe");

        store.dispatch(InvoiceAction::Upserted(stored("id-9", "INV-009"))).unwrap();
        assert_eq!(store.invoices().len(), 3);
        assert_eq!(store.invoices()[2].invoice_no, "INV-009");
    }

    #[test]
    fn test_remove() {
        let mut store = loaded(3);
        store.dispatch(InvoiceAction::Removed("id-2".to_string())).unwrap();
        assert!(store.find("INV-002").is_none());
        assert_eq!(store.invoices().len(), 2);

        assert!(matches!(
            store.dispatch(InvoiceAction::Removed("id-2".to_string())),
            Err(CoreError::InvoiceNotFound(_))
        ));
    }

    #[test]
    fn test_page_not_clamped_after_filter_shrinks() {
        let mut store = loaded(23);
        store.dispatch(InvoiceAction::SetPage(3)).unwrap();
        store.dispatch(InvoiceAction::SetSearch("INV-00".to_string())).unwrap();

        assert_eq!(store.filter().page, 3);
        let page = store.current_page().unwrap();
        assert_eq!(page.total_items, 9);
        assert!(page.is_empty());
    }

    #[test]
    fn test_invalid_actions_leave_state_unchanged() {
        let mut store = loaded(5);
        assert!(store.dispatch(InvoiceAction::SetPage(0)).is_err());
        assert!(store.dispatch(InvoiceAction::SetPageSize(0)).is_err());
        assert!(store.dispatch(InvoiceAction::SetSearch("x".repeat(500))).is_err());

        assert_eq!(store.filter(), &FilterState::default());
    }

    #[test]
    fn test_date_range_action() {
        let mut store = InvoiceStore::default();
        let mut april = stored("b", "INV-2");
        april.date = "05/04/2025".to_string();
        store
            .dispatch(InvoiceAction::Loaded(vec![stored("a", "INV-1"), april]))
            .unwrap();

        store
            .dispatch(InvoiceAction::SetDateRange(DateRange::new(
                NaiveDate::from_ymd_opt(2025, 3, 1),
                NaiveDate::from_ymd_opt(2025, 3, 31),
            )))
            .unwrap();

        let visible = store.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].invoice_no, "INV-1");
    }

    #[test]
    fn test_listeners_see_dispatched_actions() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut store = InvoiceStore::default();
        store.subscribe(move |action| {
            sink.lock().unwrap().push(format!("{action:?}"));
        });

        store.dispatch(InvoiceAction::SetTab(TabFilter::Gst)).unwrap();
        let _ = store.dispatch(InvoiceAction::SetPage(0));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], "SetTab(Gst)");
    }

    #[test]
    fn test_action_kind_hides_payload() {
        let action = InvoiceAction::Upserted(stored("id-1", "INV-001"));
        assert_eq!(action.kind(), "upserted");
        assert_eq!(InvoiceAction::Loaded(Vec::new()).kind(), "loaded");
        assert_eq!(InvoiceAction::DismissBanner.kind(), "dismiss_banner");
    }
}
