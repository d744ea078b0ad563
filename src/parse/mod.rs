//! HTML extraction for index and detail pages. Every function here takes the
//! raw page text, so it can be run inside `spawn_blocking`.

use scraper::{ElementRef, Selector};

use crate::{Error, Result};

mod detail;
mod links;
mod tracks;

pub use detail::parse_title;
pub use links::collect_links;
pub use tracks::{parse_tracks, track_table, Layout, TrackTable};

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// All text nodes below the element, untrimmed.
#[inline]
fn cell_text(el: ElementRef) -> String {
    el.text().collect()
}
