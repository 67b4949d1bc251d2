//! List query parameters: filters, sort and page window.
//!
//! A `ListQuery` is an immutable value describing one fetch. Changing the
//! page, the filters or the sort derives a new query rather than mutating
//! the one a request was issued with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorefrontError};

pub mod sort;
pub mod url_sync;

pub use sort::SortOption;
pub use url_sync::{FilterSynchronizer, UrlState};

pub const DEFAULT_PER_PAGE: u32 = 10;

/// Filter constraints shared by every list view.
///
/// Empty lists and `None` mean "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shop_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
    /// Generic filter options (the `filter` URL parameter).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<u64>,
}

impl ListFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, ids: Vec<u64>) -> Self {
        self.category_ids = ids;
        self
    }

    pub fn with_shops(mut self, ids: Vec<u64>) -> Self {
        self.shop_ids = ids;
        self
    }

    pub fn with_status(mut self, status: Option<u32>) -> Self {
        self.status = status;
        self
    }

    pub fn with_options(mut self, ids: Vec<u64>) -> Self {
        self.options = ids;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category_ids.is_empty()
            && self.shop_ids.is_empty()
            && self.status.is_none()
            && self.options.is_empty()
    }
}

/// Parameters of a single list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub filters: ListFilters,
    pub sort: SortOption,
}

impl ListQuery {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            filters: ListFilters::default(),
            sort: SortOption::default(),
        }
    }

    pub fn with_filters(mut self, filters: ListFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// The same query at another page.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// The same query reset to page 1 with new filters.
    pub fn reset_with_filters(&self, filters: ListFilters) -> Self {
        Self {
            page: 1,
            filters,
            ..self.clone()
        }
    }

    /// The same query reset to page 1 with a new sort.
    pub fn reset_with_sort(&self, sort: SortOption) -> Self {
        Self {
            page: 1,
            sort,
            ..self.clone()
        }
    }
}

impl fmt::Display for ListQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page={} per_page={}", self.page, self.per_page)?;
        if !self.filters.category_ids.is_empty() {
            write!(f, " category_id={}", join_ids(&self.filters.category_ids))?;
        }
        if !self.filters.shop_ids.is_empty() {
            write!(f, " shop_id={}", join_ids(&self.filters.shop_ids))?;
        }
        if let Some(status) = self.filters.status {
            write!(f, " status={status}")?;
        }
        if !self.filters.options.is_empty() {
            write!(f, " filter={}", join_ids(&self.filters.options))?;
        }
        if !self.sort.is_default() {
            write!(f, " sort={}", self.sort)?;
        }
        Ok(())
    }
}

/// Parse a comma-separated id list leniently.
///
/// Entries that are not positive integers are dropped, so `"1,x,,0,3"`
/// yields `[1, 3]`.
pub fn parse_id_list(s: &str) -> Vec<u64> {
    s.split(',')
        .filter_map(|part| part.trim().parse::<u64>().ok())
        .filter(|id| *id != 0)
        .collect()
}

pub fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a status filter. `all`, `-1` and the empty string mean no filter.
pub fn parse_status_filter(s: &str) -> Result<Option<u32>> {
    match s.trim() {
        "" | "all" | "-1" => Ok(None),
        other => other
            .parse::<u32>()
            .map(Some)
            .map_err(|_| StorefrontError::InvalidStatus(s.to_string())),
    }
}
