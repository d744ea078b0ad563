use scraper::Html;

use super::create_selector;
use crate::Result;

/// Path segment every disc detail link carries (`/disc/1234/`).
const DETAIL_SEGMENT: &str = "disc";
/// Segment of the per-system index and filter links, which also live under
/// the disc tree.
const SYSTEM_SEGMENT: &str = "system";
/// `/disc/{id}/` has exactly three separators; pagination and asset links
/// have more or fewer.
const DETAIL_SEPARATORS: usize = 3;

/// Returns absolute detail page URLs in page order.
/// Repeated links are kept, dedup happens on title ids further down.
pub fn collect_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let anchor_selector = create_selector("a[href]")?;
    let base = base_url.trim_end_matches('/');

    let links = doc
        .select(&anchor_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| is_detail_link(href))
        .map(|href| format!("{base}{href}"))
        .collect();
    Ok(links)
}

fn is_detail_link(href: &str) -> bool {
    href.matches('/').count() == DETAIL_SEPARATORS
        && href.split('/').any(|s| s == DETAIL_SEGMENT)
        && !href.split('/').any(|s| s == SYSTEM_SEGMENT)
}
