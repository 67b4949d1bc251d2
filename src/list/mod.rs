//! Paginated list state and the generic list-fetch controller.

pub mod controller;
pub mod trigger;

pub use controller::{FetchOutcome, ListController, PendingFetch};
pub use trigger::{ScrollTrigger, Span, visible_ratio};

/// One page of results as returned by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub requested_count: u32,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, requested_count: u32) -> Self {
        Self {
            items,
            requested_count,
        }
    }

    /// A page from an endpoint that returns everything at once.
    pub fn complete(items: Vec<T>) -> Self {
        Self::new(items, u32::MAX)
    }

    /// Continuation heuristic: a full page means there may be another one.
    ///
    /// A final page that happens to be exactly full still reports `true`,
    /// which costs one empty request at the true end of the data.
    pub fn has_more(&self) -> bool {
        self.items.len() >= self.requested_count as usize
    }
}

/// Where a list is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPhase {
    /// Nothing in flight; the current page has not been requested yet.
    #[default]
    Idle,
    /// First page in flight.
    Loading,
    /// Last request committed.
    Loaded,
    /// A follow-up page in flight.
    LoadingNext,
    /// Last request failed; pagination is disabled until a retry.
    Errored,
}

/// Accumulated state of one list instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub is_loading: bool,
    pub is_fetching_next: bool,
    pub error: Option<String>,
    pub has_more: bool,
    pub phase: ListPhase,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            is_loading: false,
            is_fetching_next: false,
            error: None,
            has_more: true,
            phase: ListPhase::Idle,
        }
    }
}

impl<T> ListState<T> {
    /// Clear everything back to an unloaded first page.
    pub fn reset(&mut self) {
        self.items.clear();
        self.current_page = 1;
        self.is_loading = false;
        self.is_fetching_next = false;
        self.error = None;
        self.has_more = true;
        self.phase = ListPhase::Idle;
    }

    /// Mark a request for `page` as in flight.
    pub(crate) fn begin(&mut self, page: u32) {
        self.current_page = page;
        self.is_loading = true;
        self.is_fetching_next = page > 1;
        self.error = None;
        self.phase = if page > 1 {
            ListPhase::LoadingNext
        } else {
            ListPhase::Loading
        };
    }

    /// Commit a fetched page. Page 1 replaces, later pages append.
    pub(crate) fn commit(&mut self, page: u32, result: ListPage<T>) -> usize {
        let has_more = result.has_more();
        let appended = result.items.len();
        if page <= 1 {
            self.items = result.items;
        } else {
            self.items.extend(result.items);
        }
        self.current_page = page;
        self.has_more = has_more;
        self.is_loading = false;
        self.is_fetching_next = false;
        self.phase = ListPhase::Loaded;
        appended
    }

    /// Record a failure. Accumulated items stay, pagination stops.
    pub(crate) fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.has_more = false;
        self.is_loading = false;
        self.is_fetching_next = false;
        self.phase = ListPhase::Errored;
    }

    /// Neither loading nor holding any item: the empty state.
    pub fn is_empty_state(&self) -> bool {
        !self.is_loading && self.items.is_empty()
    }

    pub fn can_fetch_next(&self) -> bool {
        self.has_more && !self.is_loading
    }
}
