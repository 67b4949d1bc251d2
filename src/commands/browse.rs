//! Browse a remote list in the terminal.
//!
//! The terminal is treated as a scroll viewport `rows` lines tall. A sentinel
//! row sits after the last loaded item; scrolling it into view pulls the next
//! page through the scroll trigger, exactly as a rendered list would.

use owo_colors::OwoColorize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::display::RenderItem;
use crate::error::{Result, StorefrontError};
use crate::list::{ListController, ScrollTrigger, Span, visible_ratio};
use crate::query::url_sync::{parse_location, path_and_query};
use crate::query::{FilterSynchronizer, ListFilters, ListQuery, SortOption, UrlState};
use crate::remote::{ListSource, ResourceSource};
use crate::types::Locale;

/// Terminal rows used as the viewport when none is given.
pub const DEFAULT_ROWS: u32 = 20;

#[derive(Debug, Clone)]
pub struct BrowseOptions {
    pub filters: ListFilters,
    pub sort: SortOption,
    pub per_page: u32,
    /// Stop after this many items.
    pub limit: Option<usize>,
    /// Viewport height in rows.
    pub rows: u32,
    pub show_url: bool,
    pub locale: Locale,
}

/// What a browse session loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseSummary<T> {
    pub items: Vec<T>,
    /// Requests issued, including the first page.
    pub requests: u32,
    pub has_more: bool,
    pub error: Option<String>,
}

/// Scroll through `controller`'s list until it is exhausted, fails, or
/// `limit` items have been seen.
///
/// `on_item` is called once per item, in order, as pages are committed.
pub async fn browse_list<S>(
    controller: &ListController<S>,
    rows: u32,
    limit: Option<usize>,
    mut on_item: impl FnMut(&S::Item),
) -> BrowseSummary<S::Item>
where
    S: ListSource,
    S::Item: Clone,
{
    let viewport_len = f64::from(rows.max(1));
    let mut trigger = ScrollTrigger::new();
    let mut scroll = 0.0;
    let mut requests = 1;
    let mut seen: Vec<S::Item> = Vec::new();

    if limit == Some(0) {
        return BrowseSummary {
            items: seen,
            requests: 0,
            has_more: controller.state(|s| s.has_more),
            error: None,
        };
    }

    controller.start().run().await;

    loop {
        let (fresh, loaded, has_more, failed) = controller.state(|s| {
            let fresh: Vec<S::Item> = s.items.iter().skip(seen.len()).cloned().collect();
            (fresh, s.items.len(), s.has_more, s.error.is_some())
        });
        for item in fresh {
            if limit.is_some_and(|limit| seen.len() >= limit) {
                break;
            }
            on_item(&item);
            seen.push(item);
        }

        if limit.is_some_and(|limit| seen.len() >= limit) || failed || !has_more {
            break;
        }

        let sentinel = Span::new(loaded as f64, 1.0);
        let viewport = Span::new(scroll, viewport_len);
        if let Some(pending) = trigger.observe_list(visible_ratio(sentinel, viewport), controller)
        {
            requests += 1;
            pending.run().await;
            continue;
        }

        // Scroll one screen, never past the sentinel row.
        let max_scroll = (loaded as f64 + 1.0 - viewport_len).max(0.0);
        let next = (scroll + viewport_len).min(max_scroll);
        if next <= scroll {
            tracing::debug!(loaded, scroll, "viewport cannot move and nothing fired");
            break;
        }
        scroll = next;
    }

    let (has_more, error) = controller.state(|s| (s.has_more, s.error.clone()));
    tracing::debug!(items = seen.len(), requests, has_more, "browse finished");
    BrowseSummary {
        items: seen,
        requests,
        has_more,
        error,
    }
}

/// Browse one remote resource and print it.
pub async fn cmd_browse<T>(
    source: ResourceSource<T>,
    options: BrowseOptions,
    output: OutputOptions,
) -> Result<()>
where
    T: DeserializeOwned + Serialize + RenderItem + Clone + Send + 'static,
{
    let resource = source.resource();
    let query = ListQuery::new(options.per_page)
        .with_filters(options.filters.clone())
        .with_sort(options.sort.clone());

    let mut sync = FilterSynchronizer::new(parse_location(resource.app_path())?);
    sync.write(&UrlState::new(options.filters.clone(), options.sort.clone()));
    let location = path_and_query(sync.location());

    if options.show_url && !output.json {
        println!("{}", location.dimmed());
    }

    let controller = ListController::new(source, query);
    let locale = options.locale;
    let print_rows = !output.json;
    let summary = browse_list(&controller, options.rows, options.limit, |item: &T| {
        if print_rows {
            println!("{}", item.render_line(locale));
        }
    })
    .await;

    if output.json {
        let json = json!({
            "resource": resource.name(),
            "url": location,
            "items": summary.items,
            "count": summary.items.len(),
            "requests": summary.requests,
            "has_more": summary.has_more,
            "error": summary.error,
        });
        CommandOutput::new(json).print(output)?;
    } else if summary.items.is_empty() && summary.error.is_none() {
        println!("{}", format!("No {} found.", resource.name()).dimmed());
    }

    match summary.error {
        Some(error) => Err(StorefrontError::Other(format!(
            "failed to load {}: {}",
            resource.name(),
            error
        ))),
        None => Ok(()),
    }
}
