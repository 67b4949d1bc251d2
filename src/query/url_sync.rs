//! Two-way sync between list filter state and a location's query string.
//!
//! Managed keys are `sort`, `filter`, `categoryId`, `shopId` and `status`.
//! Values at their default are omitted so URLs stay minimal; every other
//! query key and the path are left untouched.

use url::Url;

use super::{ListFilters, SortOption, join_ids, parse_id_list, parse_status_filter};
use crate::error::{Result, StorefrontError};

const KEY_SORT: &str = "sort";
const KEY_FILTER: &str = "filter";
const KEY_CATEGORY: &str = "categoryId";
const KEY_SHOP: &str = "shopId";
const KEY_STATUS: &str = "status";

const MANAGED_KEYS: &[&str] = &[KEY_SORT, KEY_FILTER, KEY_CATEGORY, KEY_SHOP, KEY_STATUS];

/// Origin used when a location is given as a bare path.
const APP_ORIGIN: &str = "http://localhost/";

/// Filter and sort state as it appears in the address bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlState {
    pub sort: SortOption,
    pub filters: ListFilters,
}

impl UrlState {
    pub fn new(filters: ListFilters, sort: SortOption) -> Self {
        Self { sort, filters }
    }

    /// Read managed keys from a URL. Malformed values fall back to their defaults.
    pub fn from_url(url: &Url) -> Self {
        let mut state = UrlState::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                KEY_SORT => state.sort = SortOption::from(value.as_ref()),
                KEY_FILTER => state.filters.options = parse_id_list(&value),
                KEY_CATEGORY => state.filters.category_ids = parse_id_list(&value),
                KEY_SHOP => state.filters.shop_ids = parse_id_list(&value),
                KEY_STATUS => state.filters.status = parse_status_filter(&value).ok().flatten(),
                _ => {}
            }
        }
        state
    }

    /// Query pairs for the non-default values, in a stable order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.sort.is_default() {
            pairs.push((KEY_SORT.to_string(), self.sort.to_string()));
        }
        if !self.filters.options.is_empty() {
            pairs.push((KEY_FILTER.to_string(), join_ids(&self.filters.options)));
        }
        if !self.filters.category_ids.is_empty() {
            pairs.push((KEY_CATEGORY.to_string(), join_ids(&self.filters.category_ids)));
        }
        if !self.filters.shop_ids.is_empty() {
            pairs.push((KEY_SHOP.to_string(), join_ids(&self.filters.shop_ids)));
        }
        if let Some(status) = self.filters.status {
            pairs.push((KEY_STATUS.to_string(), status.to_string()));
        }
        pairs
    }

    /// `url` with its managed keys replaced by this state.
    pub fn apply_to(&self, url: &Url) -> Url {
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !MANAGED_KEYS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        pairs.extend(self.to_pairs());

        let mut next = url.clone();
        if pairs.is_empty() {
            next.set_query(None);
        } else {
            next.query_pairs_mut().clear().extend_pairs(&pairs);
        }
        next
    }
}

/// Keeps a location in step with list state without feedback loops.
///
/// `write` replaces the current location (no navigation). `navigate` handles
/// an external location change (back/forward, deep link) and yields the state
/// to re-initialise from, except when the location is the one just written.
#[derive(Debug, Clone)]
pub struct FilterSynchronizer {
    location: Url,
    last_written: Option<Url>,
}

impl FilterSynchronizer {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            last_written: None,
        }
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    /// State encoded in the current location.
    pub fn current_state(&self) -> UrlState {
        UrlState::from_url(&self.location)
    }

    /// Mirror `state` into the location. Returns true if the location changed.
    ///
    /// A location that already encodes `state`, however it is spelled, is
    /// left as is.
    pub fn write(&mut self, state: &UrlState) -> bool {
        if self.current_state() == *state {
            return false;
        }
        let next = state.apply_to(&self.location);
        if next == self.location {
            return false;
        }
        tracing::debug!(location = %next, "replacing location");
        self.location = next.clone();
        self.last_written = Some(next);
        true
    }

    /// Handle a location change that did not come from `write`.
    pub fn navigate(&mut self, url: Url) -> Option<UrlState> {
        let echoed = self.last_written.take().is_some_and(|written| written == url);
        self.location = url;
        if echoed {
            return None;
        }
        Some(self.current_state())
    }
}

/// Parse an absolute URL, or a path relative to the app origin.
pub fn parse_location(s: &str) -> Result<Url> {
    match Url::parse(s) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(APP_ORIGIN)
            .and_then(|base| base.join(s))
            .map_err(|e| StorefrontError::InvalidUrl(s.to_string(), e.to_string())),
        Err(e) => Err(StorefrontError::InvalidUrl(s.to_string(), e.to_string())),
    }
}

/// Path plus query, as shown for app-relative locations.
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
