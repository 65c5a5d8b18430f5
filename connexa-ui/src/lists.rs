//! Reactive glue between [`PagedList`] and the views.

use std::future::Future;

use connexa_core::notice::Notice;
use connexa_core::paging::{ListStore, LoadOutcome, PagedList, DEFAULT_PAGE_SIZE};
use connexa_core::ActionError;
use leptos::*;

/// A paged list living in a signal, so every state change re-renders.
pub struct SignalList<T: 'static>(pub RwSignal<PagedList<T>>);

impl<T: 'static> SignalList<T> {
    pub fn new() -> Self {
        Self(create_rw_signal(PagedList::new(DEFAULT_PAGE_SIZE)))
    }
}

impl<T: 'static> Clone for SignalList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for SignalList<T> {}

impl<T: 'static> ListStore<T> for SignalList<T> {
    fn with_list<O>(&self, f: impl FnOnce(&mut PagedList<T>) -> O) -> Option<O> {
        // `None` once the owning view has been disposed.
        self.0.try_update(f)
    }
}

/// Errors a load produced, as notices for the alert area.
pub fn outcome_notices(outcomes: &[LoadOutcome]) -> Vec<Notice> {
    outcomes.iter().filter_map(LoadOutcome::error).map(Notice::from).collect()
}

/// Visibility of a list's end marker plus a brake for failed loads.
///
/// Loading is level-triggered: whenever the marker is visible and the list may
/// grow, the next page is requested, and this re-evaluates after every list
/// change so loading continues until the viewport is filled or the data runs
/// out. A failed fetch halts the trigger until the marker leaves the viewport,
/// so errors are never retried in a loop.
#[derive(Clone, Copy)]
pub struct ScrollTrigger {
    pub visible: RwSignal<bool>,
    halted: RwSignal<bool>,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        let visible = create_rw_signal(false);
        let halted = create_rw_signal(false);
        create_effect(move |_| {
            if !visible.get() {
                halted.set(false);
            }
        });
        Self { visible, halted }
    }

    pub fn resume(&self) {
        self.halted.set(false);
    }

    /// Run a page fetch, halting the trigger when it fails. The halt lands
    /// before the list records the failure, so the watcher never sees a
    /// retryable state with the brake released.
    pub async fn guard<T>(
        self,
        fetch: impl Future<Output = Result<T, ActionError>>,
    ) -> Result<T, ActionError> {
        let result = fetch.await;
        if result.is_err() {
            self.halted.try_set(true);
        }
        result
    }

    pub fn watch<T: 'static>(self, list: SignalList<T>, load_more: impl Fn() + 'static) {
        create_effect(move |_| {
            let wanted = self.visible.get()
                && !self.halted.get()
                && list.0.with(PagedList::can_load_more);
            if wanted {
                load_more();
            }
        });
    }
}
