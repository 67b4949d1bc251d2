//! Generic list-fetch controller.
//!
//! The controller owns the list state and the current query. Every request
//! it issues is a [`PendingFetch`] carrying its own [`CancellationToken`];
//! issuing a new request cancels the previous token, and a response is only
//! committed while its request is still the active one. Last write wins by
//! cancellation, not by timestamp.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{ListPhase, ListState};
use crate::error::StorefrontError;
use crate::query::{ListFilters, ListQuery, SortOption};
use crate::remote::ListSource;

/// Result of running a [`PendingFetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was committed to the list.
    Committed { appended: usize, has_more: bool },
    /// The fetch failed; the message is now the list's error.
    Failed(String),
    /// A newer request replaced this one; nothing was committed.
    Superseded,
}

struct ActiveRequest {
    id: u64,
    token: CancellationToken,
}

struct Shared<T> {
    state: ListState<T>,
    query: ListQuery,
    active: Option<ActiveRequest>,
    next_request_id: u64,
    revision: u64,
}

/// Owns pagination, filter and loading state for one list instance.
pub struct ListController<S: ListSource> {
    source: Arc<S>,
    shared: Arc<Mutex<Shared<S::Item>>>,
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S, query: ListQuery) -> Self {
        Self::with_source(Arc::new(source), query)
    }

    pub fn with_source(source: Arc<S>, query: ListQuery) -> Self {
        let query = query.at_page(1);
        Self {
            source,
            shared: Arc::new(Mutex::new(Shared {
                state: ListState::default(),
                query,
                active: None,
                next_request_id: 0,
                revision: 0,
            })),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Query of the most recently issued (or about to be issued) request.
    pub fn query(&self) -> ListQuery {
        self.shared.lock().query.clone()
    }

    /// Borrow the current state.
    pub fn state<R>(&self, f: impl FnOnce(&ListState<S::Item>) -> R) -> R {
        f(&self.shared.lock().state)
    }

    /// Counter bumped on every state change.
    pub fn revision(&self) -> u64 {
        self.shared.lock().revision
    }

    /// Whether a request is in flight.
    pub fn is_in_flight(&self) -> bool {
        self.shared.lock().active.is_some()
    }

    /// Issue the request for the current page (initial load).
    pub fn start(&self) -> PendingFetch<S> {
        let mut shared = self.shared.lock();
        let query = shared.query.at_page(shared.state.current_page);
        self.issue(&mut shared, query)
    }

    /// Request the page after the current one.
    ///
    /// Returns `None` without issuing anything while a request is in flight
    /// or once the list has no more pages. A list that has never been
    /// started loads its first page instead.
    pub fn fetch_next_page(&self) -> Option<PendingFetch<S>> {
        let mut shared = self.shared.lock();
        if !shared.state.can_fetch_next() {
            return None;
        }
        let page = match shared.state.phase {
            ListPhase::Idle => shared.state.current_page,
            _ => shared.state.current_page + 1,
        };
        let query = shared.query.at_page(page);
        Some(self.issue(&mut shared, query))
    }

    /// Replace the filters, clear the list and load page 1 again.
    pub fn refetch_with_filters(&self, filters: ListFilters) -> PendingFetch<S> {
        let mut shared = self.shared.lock();
        let query = shared.query.reset_with_filters(filters);
        shared.state.reset();
        self.issue(&mut shared, query)
    }

    /// Change the sort, clear the list and load page 1 again.
    pub fn set_sort(&self, sort: SortOption) -> PendingFetch<S> {
        let mut shared = self.shared.lock();
        let query = shared.query.reset_with_sort(sort);
        shared.state.reset();
        self.issue(&mut shared, query)
    }

    /// Re-issue the page that failed. Accumulated items are kept.
    ///
    /// Returns `None` unless the list is in the errored state.
    pub fn retry(&self) -> Option<PendingFetch<S>> {
        let mut shared = self.shared.lock();
        if shared.state.phase != ListPhase::Errored {
            return None;
        }
        shared.state.has_more = true;
        let query = shared.query.clone();
        Some(self.issue(&mut shared, query))
    }

    fn issue(&self, shared: &mut Shared<S::Item>, query: ListQuery) -> PendingFetch<S> {
        if let Some(previous) = shared.active.take() {
            tracing::debug!(request_id = previous.id, "cancelling superseded list request");
            previous.token.cancel();
        }

        shared.next_request_id += 1;
        let id = shared.next_request_id;
        let token = CancellationToken::new();

        shared.state.begin(query.page);
        shared.query = query.clone();
        shared.active = Some(ActiveRequest {
            id,
            token: token.clone(),
        });
        shared.revision += 1;

        tracing::debug!(request_id = id, query = %query, "issued list request");

        PendingFetch {
            source: Arc::clone(&self.source),
            shared: Arc::clone(&self.shared),
            query,
            token,
            id,
        }
    }
}

impl<S: ListSource> ListController<S>
where
    S::Item: Clone,
{
    /// Copy of the current state.
    pub fn snapshot(&self) -> ListState<S::Item> {
        self.shared.lock().state.clone()
    }
}

impl<S: ListSource> Drop for ListController<S> {
    fn drop(&mut self) {
        if let Some(active) = self.shared.lock().active.take() {
            active.token.cancel();
        }
    }
}

/// A request issued by a [`ListController`], not yet run.
///
/// Dropping it without running leaves the list loading until the next
/// request supersedes it.
#[must_use = "a pending fetch does nothing until it is run or spawned"]
pub struct PendingFetch<S: ListSource> {
    source: Arc<S>,
    shared: Arc<Mutex<Shared<S::Item>>>,
    query: ListQuery,
    token: CancellationToken,
    id: u64,
}

impl<S: ListSource> PendingFetch<S> {
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn request_id(&self) -> u64 {
        self.id
    }

    /// Perform the fetch and commit its result if still current.
    pub async fn run(self) -> FetchOutcome {
        let PendingFetch {
            source,
            shared,
            query,
            token,
            id,
        } = self;

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(StorefrontError::Cancelled),
            result = source.fetch_page(&query, &token) => result,
        };

        let mut guard = shared.lock();
        let is_active = guard.active.as_ref().is_some_and(|active| active.id == id);
        if token.is_cancelled() || !is_active {
            let aborted = result.as_ref().err().is_some_and(StorefrontError::is_cancelled);
            tracing::debug!(request_id = id, aborted, "discarding response of superseded request");
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                guard.active = None;
                let has_more = page.has_more();
                let appended = guard.state.commit(query.page, page);
                guard.revision += 1;
                tracing::debug!(request_id = id, appended, has_more, "committed list page");
                FetchOutcome::Committed { appended, has_more }
            }
            // The token is live here, so a cancel reported by the source is
            // its own abort and fails the request like any other error.
            Err(e) => {
                guard.active = None;
                let message = e.to_string();
                tracing::warn!(request_id = id, query = %query, "list request failed: {message}");
                guard.state.fail(message.clone());
                guard.revision += 1;
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Run the fetch on the tokio runtime.
    pub fn spawn(self) -> JoinHandle<FetchOutcome> {
        tokio::spawn(self.run())
    }
}
