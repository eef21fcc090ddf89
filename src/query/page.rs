//! Pagination parsing and the Content-Range response header.

use axum::http::header::HeaderMap;

use crate::params::ListParams;

/// Page size applied when the request names none
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Upper bound on the page size a client may request
pub const MAX_PAGE_SIZE: u64 = 1_000;

/// Parse the React Admin `[start, end]` range, inclusive on both ends
fn parse_range(range_str: Option<&str>) -> (u64, u64) {
    range_str.map_or((0, DEFAULT_PAGE_SIZE - 1), |r| {
        serde_json::from_str::<[u64; 2]>(r)
            .map(|range| (range[0], range[1]))
            .unwrap_or((0, DEFAULT_PAGE_SIZE - 1))
    })
}

/// Resolve `(offset, limit)` from the request parameters.
///
/// `page`/`per_page` (1-based) wins over `range`. The limit is clamped to
/// `1..=MAX_PAGE_SIZE` so a single request cannot drain the table.
#[must_use]
pub fn parse_pagination(params: &ListParams) -> (u64, u64) {
    let (offset, limit) = if let (Some(page), Some(per_page)) = (params.page, params.per_page) {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        (offset, per_page)
    } else if let Some(range) = params.range.as_deref() {
        let (start, end) = parse_range(Some(range));
        (start, end.saturating_sub(start).saturating_add(1))
    } else {
        (0, DEFAULT_PAGE_SIZE)
    };

    (offset, limit.clamp(1, MAX_PAGE_SIZE))
}

/// Strip control characters so the value is always a legal header
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Build the `Content-Range` header for a list response, in the shape
/// `resource start-end/total`.
#[must_use]
pub fn content_range(offset: u64, limit: u64, total_count: u64, resource_name: &str) -> HeaderMap {
    let last = offset
        .saturating_add(limit)
        .saturating_sub(1)
        .min(total_count);

    let safe_name = sanitize_resource_name(resource_name);
    let value = format!("{safe_name} {offset}-{last}/{total_count}");

    let mut headers = HeaderMap::new();
    if let Ok(parsed) = value.parse() {
        headers.insert("Content-Range", parsed);
    } else if let Ok(fallback) = format!("items {offset}-{last}/{total_count}").parse() {
        headers.insert("Content-Range", fallback);
    }

    headers
}
