//! Filter URL commands.
//!
//! - `url <path>`: build the canonical filter URL for a location
//! - `url --parse <url>`: show the filter state a URL encodes

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::query::url_sync::{parse_location, path_and_query};
use crate::query::{FilterSynchronizer, ListFilters, SortOption, UrlState, join_ids};

fn location_string(url: &url::Url, input: &str) -> String {
    if url::Url::parse(input).is_ok() {
        url.to_string()
    } else {
        path_and_query(url)
    }
}

/// Write `filters` and `sort` into `location`, keeping its other query keys.
pub fn cmd_url_build(
    location: &str,
    filters: ListFilters,
    sort: SortOption,
    output: OutputOptions,
) -> Result<()> {
    let mut sync = FilterSynchronizer::new(parse_location(location)?);
    let state = UrlState::new(filters, sort);
    let changed = sync.write(&state);
    let url = location_string(sync.location(), location);

    CommandOutput::new(json!({
        "url": url,
        "changed": changed,
    }))
    .with_text(url)
    .print(output)
}

/// Print the filter state encoded in `location`.
pub fn cmd_url_parse(location: &str, output: OutputOptions) -> Result<()> {
    let url = parse_location(location)?;
    let state = UrlState::from_url(&url);
    let filters = &state.filters;

    let json = json!({
        "sort": state.sort.to_string(),
        "filter": filters.options,
        "category_ids": filters.category_ids,
        "shop_ids": filters.shop_ids,
        "status": filters.status,
    });

    let show_ids = |ids: &[u64]| {
        if ids.is_empty() {
            "-".dimmed().to_string()
        } else {
            join_ids(ids)
        }
    };
    let mut text = String::new();
    text.push_str(&format!("{}: {}\n", "sort".cyan(), state.sort));
    text.push_str(&format!("{}: {}\n", "filter".cyan(), show_ids(&filters.options)));
    text.push_str(&format!(
        "{}: {}\n",
        "categoryId".cyan(),
        show_ids(&filters.category_ids)
    ));
    text.push_str(&format!("{}: {}\n", "shopId".cyan(), show_ids(&filters.shop_ids)));
    let status = match filters.status {
        Some(code) => code.to_string(),
        None => "all".dimmed().to_string(),
    };
    text.push_str(&format!("{}: {}", "status".cyan(), status));

    CommandOutput::new(json).with_text(text).print(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_string_keeps_input_form() {
        let url = parse_location("/list?sort=oldest").unwrap();
        assert_eq!(location_string(&url, "/list"), "/list?sort=oldest");

        let absolute = parse_location("https://shop.test/list").unwrap();
        assert_eq!(
            location_string(&absolute, "https://shop.test/list"),
            "https://shop.test/list"
        );
    }
}
