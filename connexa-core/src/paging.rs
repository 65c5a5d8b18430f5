//! Incremental list loading shared by every management view.
//!
//! [`PagedList`] is the state of one list and decides which page may be
//! requested next; it never performs I/O. [`ListController`] pairs a list
//! store with a fetch function and runs the request/apply cycle.
//!
//! Each load captures the list's generation. Starting an initial load or a
//! reset bumps it, so a response that arrives for an older generation is
//! dropped instead of being appended onto freshly replaced items.

use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::envelope::Page;
use crate::error::ActionError;
use crate::session::{Role, Session};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    More,
}

/// A page request handed out by [`PagedList`]; must be passed back to
/// [`PagedList::finish`] with the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: LoadKind,
    pub page: u32,
    pub limit: u32,
    pub identity: String,
    generation: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A guard refused the load; no request was issued.
    Skipped,
    Applied { added: usize },
    /// The response belonged to an older generation or to a list that no
    /// longer exists.
    Discarded,
    Failed(ActionError),
}

impl LoadOutcome {
    pub fn error(&self) -> Option<&ActionError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PagedList<T> {
    items: Vec<T>,
    page: u32,
    has_more: bool,
    loaded: bool,
    loading_initial: bool,
    loading_more: bool,
    generation: u64,
    identity: Option<String>,
    limit: u32,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T> PagedList<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            has_more: true,
            loaded: false,
            loading_initial: false,
            loading_more: false,
            generation: 0,
            identity: None,
            limit: limit.max(1),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading_initial(&self) -> bool {
        self.loading_initial
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn can_load_more(&self) -> bool {
        self.loaded && self.has_more && !self.loading_initial && !self.loading_more
    }

    /// Start loading page 1 for `identity`. A different identity than the one
    /// the current pages belong to discards them first.
    pub fn begin_initial(&mut self, identity: &str) -> Option<PageRequest> {
        if identity.trim().is_empty() {
            return None;
        }
        if self.identity.as_deref() != Some(identity) {
            self.reset();
            self.identity = Some(identity.to_string());
        }
        self.generation += 1;
        self.loading_initial = true;
        // Any in-flight page is now stale and will be discarded on arrival.
        self.loading_more = false;
        Some(self.request(LoadKind::Initial, 1))
    }

    pub fn begin_more(&mut self) -> Option<PageRequest> {
        if !self.can_load_more() {
            return None;
        }
        self.loading_more = true;
        Some(self.request(LoadKind::More, self.page + 1))
    }

    pub fn finish(
        &mut self,
        request: &PageRequest,
        result: Result<Page<T>, ActionError>,
    ) -> LoadOutcome {
        if request.generation != self.generation {
            tracing::debug!(
                page = request.page,
                request_generation = request.generation,
                generation = self.generation,
                "dropping stale page"
            );
            return LoadOutcome::Discarded;
        }

        match request.kind {
            LoadKind::Initial => self.loading_initial = false,
            LoadKind::More => self.loading_more = false,
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => return LoadOutcome::Failed(e),
        };

        self.has_more = page.has_more();
        let added = page.items.len();
        match request.kind {
            LoadKind::Initial => {
                self.items = page.items;
                self.page = 1;
                self.loaded = true;
            }
            LoadKind::More => {
                self.items.extend(page.items);
                self.page = request.page;
            }
        }
        LoadOutcome::Applied { added }
    }

    /// Give up on a request without a response, releasing its in-flight flag.
    pub fn cancel(&mut self, request: &PageRequest) {
        if request.generation != self.generation {
            return;
        }
        match request.kind {
            LoadKind::Initial => self.loading_initial = false,
            LoadKind::More => self.loading_more = false,
        }
    }

    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new(self.limit);
        self.generation = generation;
    }

    fn request(&self, kind: LoadKind, page: u32) -> PageRequest {
        PageRequest {
            kind,
            page,
            limit: self.limit,
            identity: self.identity.clone().unwrap_or_default(),
            generation: self.generation,
        }
    }
}

// ── Stores ───────────────────────────────────────────────────────────────────

/// Somewhere a [`PagedList`] lives. Returns `None` once the owner is gone,
/// which turns late responses into no-ops.
pub trait ListStore<T> {
    fn with_list<O>(&self, f: impl FnOnce(&mut PagedList<T>) -> O) -> Option<O>;
}

impl<T> ListStore<T> for Rc<RefCell<PagedList<T>>> {
    fn with_list<O>(&self, f: impl FnOnce(&mut PagedList<T>) -> O) -> Option<O> {
        Some(f(&mut self.borrow_mut()))
    }
}

impl<T> ListStore<T> for Weak<RefCell<PagedList<T>>> {
    fn with_list<O>(&self, f: impl FnOnce(&mut PagedList<T>) -> O) -> Option<O> {
        self.upgrade().map(|list| f(&mut list.borrow_mut()))
    }
}

// ── Controller ───────────────────────────────────────────────────────────────

/// What a fetch function receives for one page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageQuery<R: Role> {
    pub session: Session<R>,
    pub page: u32,
    pub limit: u32,
}

pub struct ListController<T, R, S, F> {
    store: S,
    fetch: F,
    _marker: PhantomData<fn() -> (T, R)>,
}

impl<T, R, S, F, Fut> ListController<T, R, S, F>
where
    R: Role,
    S: ListStore<T>,
    F: Fn(PageQuery<R>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ActionError>>,
{
    pub fn new(store: S, fetch: F) -> Self {
        Self {
            store,
            fetch,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn can_load_more(&self) -> bool {
        self.store.with_list(|l| l.can_load_more()).unwrap_or(false)
    }

    /// Fetch page 1 and replace the items. No-op without an active session.
    pub async fn load_initial(&self, session: &Session<R>) -> LoadOutcome {
        if !session.is_active() {
            return LoadOutcome::Skipped;
        }
        let begun = self.store.with_list(|l| l.begin_initial(session.secret()));
        let Some(request) = begun.flatten() else {
            return LoadOutcome::Skipped;
        };
        self.run(request).await
    }

    /// Fetch the next page and append it. No-op while a load is in flight or
    /// once the last page has been seen.
    pub async fn load_more(&self) -> LoadOutcome {
        let Some(request) = self.store.with_list(PagedList::begin_more).flatten() else {
            return LoadOutcome::Skipped;
        };
        self.run(request).await
    }

    /// Keep loading pages while the end-of-list marker stays visible.
    pub async fn fill_while_visible(&self, visible: impl Fn() -> bool) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while visible() {
            let outcome = self.load_more().await;
            let applied = matches!(outcome, LoadOutcome::Applied { .. });
            if outcome != LoadOutcome::Skipped {
                outcomes.push(outcome);
            }
            if !applied {
                break;
            }
        }
        outcomes
    }

    pub fn reset(&self) {
        self.store.with_list(PagedList::reset);
    }

    async fn run(&self, request: PageRequest) -> LoadOutcome {
        let query = PageQuery {
            session: Session::new(request.identity.clone()),
            page: request.page,
            limit: request.limit,
        };
        let result = (self.fetch)(query).await;
        if let Err(e) = &result {
            tracing::warn!(
                page = request.page,
                kind = ?request.kind,
                error = ?e,
                "page load failed"
            );
        }
        self.store
            .with_list(|l| l.finish(&request, result))
            .unwrap_or(LoadOutcome::Discarded)
    }
}

/// Load page 1 of two lists from a single backend call.
///
/// The referrals listing answers with both halves at once; later pages are
/// requested per list through each list's own controller.
pub async fn load_initial_pair<A, B, R, SA, SB, Fut>(
    first: &SA,
    second: &SB,
    session: &Session<R>,
    fetch: impl FnOnce(PageQuery<R>) -> Fut,
) -> (LoadOutcome, LoadOutcome)
where
    R: Role,
    SA: ListStore<A>,
    SB: ListStore<B>,
    Fut: Future<Output = Result<(Page<A>, Page<B>), ActionError>>,
{
    if !session.is_active() {
        return (LoadOutcome::Skipped, LoadOutcome::Skipped);
    }
    let a = first.with_list(|l| l.begin_initial(session.secret())).flatten();
    let b = second.with_list(|l| l.begin_initial(session.secret())).flatten();
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (a, b) => {
            if let Some(a) = a {
                first.with_list(|l| l.cancel(&a));
            }
            if let Some(b) = b {
                second.with_list(|l| l.cancel(&b));
            }
            return (LoadOutcome::Skipped, LoadOutcome::Skipped);
        }
    };

    let query = PageQuery {
        session: session.clone(),
        page: 1,
        limit: a.limit,
    };
    let (ra, rb) = match fetch(query).await {
        Ok((pa, pb)) => (Ok(pa), Ok(pb)),
        Err(e) => {
            tracing::warn!(error = ?e, "paired page load failed");
            (Err(e.clone()), Err(e))
        }
    };
    (
        first.with_list(|l| l.finish(&a, ra)).unwrap_or(LoadOutcome::Discarded),
        second.with_list(|l| l.finish(&b, rb)).unwrap_or(LoadOutcome::Discarded),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Meta;
    use crate::session::{Admin, AdminSession, MemberSession};
    use futures::executor::block_on;
    use futures::future::{ready, Ready};
    use std::collections::HashMap;

    fn meta(page: u32, total_pages: u32) -> Option<Meta> {
        Some(Meta {
            page,
            limit: 10,
            total: total_pages * 10,
            total_pages,
        })
    }

    /// Canned pages keyed by page number; records every query it serves.
    #[derive(Default)]
    struct Script {
        pages: RefCell<HashMap<u32, Result<Page<&'static str>, ActionError>>>,
        calls: RefCell<Vec<(String, u32, u32)>>,
    }

    impl Script {
        fn set(&self, page: u32, result: Result<Page<&'static str>, ActionError>) {
            self.pages.borrow_mut().insert(page, result);
        }

        fn fetch(&self, q: PageQuery<Admin>) -> Ready<Result<Page<&'static str>, ActionError>> {
            self.calls
                .borrow_mut()
                .push((q.session.secret().to_string(), q.page, q.limit));
            let result = self
                .pages
                .borrow()
                .get(&q.page)
                .cloned()
                .unwrap_or_else(|| Err(ActionError::Transport("no page".into())));
            ready(result)
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    fn controller(
        script: &Script,
    ) -> ListController<
        &'static str,
        Admin,
        Rc<RefCell<PagedList<&'static str>>>,
        impl Fn(PageQuery<Admin>) -> Ready<Result<Page<&'static str>, ActionError>> + '_,
    > {
        ListController::new(Rc::new(RefCell::new(PagedList::default())), move |q| script.fetch(q))
    }

    fn items(store: &RefCell<PagedList<&'static str>>) -> Vec<&'static str> {
        store.borrow().items().to_vec()
    }

    #[test]
    fn loads_first_page_then_appends_the_next() {
        let script = Script::default();
        script.set(1, Ok(Page::new(vec!["A", "B"], meta(1, 2))));
        script.set(2, Ok(Page::new(vec!["C"], meta(2, 2))));
        let list = controller(&script);
        let session = AdminSession::new("admin-key");

        assert_eq!(block_on(list.load_initial(&session)), LoadOutcome::Applied { added: 2 });
        assert_eq!(items(list.store()), vec!["A", "B"]);
        assert!(list.store().borrow().has_more());

        assert_eq!(block_on(list.load_more()), LoadOutcome::Applied { added: 1 });
        assert_eq!(items(list.store()), vec!["A", "B", "C"]);
        assert_eq!(list.store().borrow().page(), 2);
        assert!(!list.store().borrow().has_more());

        assert_eq!(
            *script.calls.borrow(),
            vec![("admin-key".to_string(), 1, 10), ("admin-key".to_string(), 2, 10)]
        );
    }

    #[test]
    fn load_more_is_a_no_op_once_exhausted() {
        let script = Script::default();
        script.set(1, Ok(Page::new(vec!["A"], meta(1, 1))));
        let list = controller(&script);

        block_on(list.load_initial(&AdminSession::new("k")));
        assert_eq!(block_on(list.load_more()), LoadOutcome::Skipped);
        assert_eq!(script.call_count(), 1);
    }

    #[test]
    fn empty_identity_issues_no_request() {
        let script = Script::default();
        let list = controller(&script);

        assert_eq!(block_on(list.load_initial(&AdminSession::empty())), LoadOutcome::Skipped);
        assert_eq!(block_on(list.load_more()), LoadOutcome::Skipped);
        assert_eq!(script.call_count(), 0);
    }

    #[test]
    fn reload_replaces_accumulated_pages() {
        let script = Script::default();
        script.set(1, Ok(Page::new(vec!["A", "B"], meta(1, 2))));
        script.set(2, Ok(Page::new(vec!["C"], meta(2, 2))));
        let list = controller(&script);
        let session = AdminSession::new("k");

        block_on(list.load_initial(&session));
        block_on(list.load_more());
        script.set(1, Ok(Page::new(vec!["B"], meta(1, 2))));
        block_on(list.load_initial(&session));

        assert_eq!(items(list.store()), vec!["B"]);
        assert_eq!(list.store().borrow().page(), 1);
        assert!(list.can_load_more());
    }

    #[test]
    fn failures_keep_state_and_allow_retry() {
        let script = Script::default();
        script.set(1, Ok(Page::new(vec!["A", "B"], meta(1, 2))));
        script.set(2, Err(ActionError::Application("Erro ao carregar".into())));
        let list = controller(&script);
        let session = AdminSession::new("k");
        block_on(list.load_initial(&session));

        let outcome = block_on(list.load_more());
        assert_eq!(outcome.error(), Some(&ActionError::Application("Erro ao carregar".into())));
        assert_eq!(items(list.store()), vec!["A", "B"]);
        assert_eq!(list.store().borrow().page(), 1);

        script.set(2, Ok(Page::new(vec!["C"], meta(2, 2))));
        assert_eq!(block_on(list.load_more()), LoadOutcome::Applied { added: 1 });

        script.set(1, Err(ActionError::Transport("connection refused".into())));
        assert!(matches!(block_on(list.load_initial(&session)), LoadOutcome::Failed(_)));
        assert_eq!(items(list.store()), vec!["A", "B", "C"]);
    }

    #[test]
    fn stale_page_is_dropped_after_reload() {
        let mut list = PagedList::<&str>::default();
        let first = list.begin_initial("k").expect("initial");
        list.finish(&first, Ok(Page::new(vec!["A", "B"], meta(1, 3))));

        let more = list.begin_more().expect("more");
        assert_eq!(more.page, 2);
        assert!(list.begin_more().is_none(), "one page in flight at a time");

        let reload = list.begin_initial("k").expect("reload");
        assert_eq!(
            list.finish(&reload, Ok(Page::new(vec!["B", "A"], meta(1, 3)))),
            LoadOutcome::Applied { added: 2 }
        );
        assert_eq!(
            list.finish(&more, Ok(Page::new(vec!["C"], meta(2, 3)))),
            LoadOutcome::Discarded
        );
        assert_eq!(list.items(), &["B", "A"]);
        assert_eq!(list.page(), 1);
    }

    #[test]
    fn load_more_waits_for_initial_load() {
        let mut list = PagedList::<&str>::default();
        assert!(list.begin_more().is_none(), "nothing loaded yet");
        let _initial = list.begin_initial("k").expect("initial");
        assert!(list.begin_more().is_none(), "initial still in flight");
    }

    #[test]
    fn switching_identity_discards_pages() {
        let mut list = PagedList::<&str>::default();
        let req = list.begin_initial("admin-a").expect("initial");
        list.finish(&req, Ok(Page::new(vec!["A"], meta(1, 2))));

        let req = list.begin_initial("admin-b").expect("initial");
        assert!(list.items().is_empty());
        assert_eq!(req.identity, "admin-b");
        assert_eq!(list.identity(), Some("admin-b"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut list = PagedList::<&str>::default();
        let req = list.begin_initial("k").expect("initial");
        list.finish(&req, Ok(Page::new(vec!["A"], meta(1, 1))));
        list.reset();

        assert!(list.items().is_empty());
        assert_eq!(list.page(), 1);
        assert!(list.has_more());
        assert_eq!(list.identity(), None);
        assert!(!list.can_load_more());
    }

    #[test]
    fn late_response_after_owner_dropped_is_discarded() {
        let owner = Rc::new(RefCell::new(PagedList::<&str>::default()));
        let store = Rc::downgrade(&owner);
        let list = ListController::new(store, |_q: PageQuery<Admin>| {
            ready(Ok(Page::new(vec!["A"], meta(1, 1))))
        });
        let req = list.store().with_list(|l| l.begin_initial("k")).flatten();
        assert!(req.is_some());
        drop(owner);

        assert_eq!(block_on(list.load_initial(&AdminSession::new("k"))), LoadOutcome::Skipped);
        assert_eq!(block_on(list.load_more()), LoadOutcome::Skipped);
    }

    #[test]
    fn fills_until_marker_scrolls_away() {
        let script = Script::default();
        script.set(1, Ok(Page::new(vec!["A"], meta(1, 4))));
        script.set(2, Ok(Page::new(vec!["B"], meta(2, 4))));
        script.set(3, Ok(Page::new(vec!["C"], meta(3, 4))));
        script.set(4, Ok(Page::new(vec!["D"], meta(4, 4))));
        let list = controller(&script);
        block_on(list.load_initial(&AdminSession::new("k")));

        // Marker stays visible until three items are on screen.
        let outcomes =
            block_on(list.fill_while_visible(|| list.store().borrow().items().len() < 3));
        assert_eq!(outcomes.len(), 2);
        assert_eq!(items(list.store()), vec!["A", "B", "C"]);

        // Always visible: stops by itself once the data runs out.
        let outcomes = block_on(list.fill_while_visible(|| true));
        assert_eq!(outcomes, vec![LoadOutcome::Applied { added: 1 }]);
        assert_eq!(script.call_count(), 4);
    }

    #[test]
    fn paired_initial_load_feeds_both_lists() {
        let mine = Rc::new(RefCell::new(PagedList::<&str>::default()));
        let to_me = Rc::new(RefCell::new(PagedList::<&str>::default()));
        let session = MemberSession::new("member-1");

        let (a, b) = block_on(load_initial_pair(&mine, &to_me, &session, |q| {
            assert_eq!(q.page, 1);
            ready(Ok((
                Page::new(vec!["m1", "m2"], meta(1, 2)),
                Page::new(vec!["t1"], meta(1, 1)),
            )))
        }));
        assert_eq!(a, LoadOutcome::Applied { added: 2 });
        assert_eq!(b, LoadOutcome::Applied { added: 1 });
        assert!(mine.borrow().can_load_more());
        assert!(!to_me.borrow().can_load_more());

        let (a, b) = block_on(load_initial_pair(&mine, &to_me, &session, |_q| {
            let err = ActionError::Application("Membro não encontrado".into());
            ready(Err::<(Page<&str>, Page<&str>), _>(err))
        }));
        assert!(matches!(a, LoadOutcome::Failed(_)));
        assert!(matches!(b, LoadOutcome::Failed(_)));
        assert_eq!(mine.borrow().items(), &["m1", "m2"]);
        assert!(!mine.borrow().is_loading_initial());
    }
}
