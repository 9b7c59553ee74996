//! # Store State
//!
//! The invoice store shared by command handlers.
//!
//! The store is wrapped in `Arc<Mutex<T>>`: handlers run on a multi-threaded
//! runtime and every change goes through one `dispatch` at a time. The lock
//! is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bizdash_core::error::CoreResult;
use bizdash_core::filter::FilterState;
use bizdash_core::store::{InvoiceAction, InvoiceStore};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct StoreState {
    store: Arc<Mutex<InvoiceStore>>,
}

impl StoreState {
    /// A fresh store that traces every applied action.
    pub fn new(filter: FilterState) -> Self {
        let mut store = InvoiceStore::new(filter);
        store.subscribe(|action| trace!(action = action.kind(), "Store updated"));
        StoreState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InvoiceStore> {
        // Listeners run after the mutation, so a poisoned store is still consistent.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let page = state.with_store(|store| store.current_page())?;
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InvoiceStore) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the store.
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut InvoiceStore) -> R,
    {
        f(&mut self.lock())
    }

    pub fn dispatch(&self, action: InvoiceAction) -> CoreResult<()> {
        self.with_store_mut(|store| store.dispatch(action))
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdash_core::types::Invoice;

    #[test]
    fn test_clones_share_one_store() {
        let state = StoreState::default();
        let other = state.clone();

        state
            .dispatch(InvoiceAction::Loaded(vec![Invoice::default()]))
            .unwrap();

        assert_eq!(other.with_store(|s| s.invoices().len()), 1);
    }

    #[test]
    fn test_dispatch_errors_pass_through() {
        let state = StoreState::default();
        assert!(state.dispatch(InvoiceAction::SetPage(0)).is_err());
        assert_eq!(state.with_store(|s| s.filter().page), 1);
    }
}
