//! REDUMP SCRAPER
//! Walks the per-letter disc index of one platform, parses every disc detail
//! page and hands titles + tracks to the configured outputs.

mod macros;

pub mod config;
pub mod dedup;
mod error;
pub mod export;
pub mod model;
pub mod parse;
pub mod process;
pub mod request;
pub mod store;

pub use config::Config;
pub use dedup::Deduplicator;
pub use error::{Error, Result};
pub use model::{Title, Totals, Track};

const BASE_URL: &str = "http://redump.org";
const PLATFORM: &str = "psx";
/// `~` is the catch-all shard for titles that don't start with a letter.
const SHARDS: [&str; 27] = [
    "~", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
    "s", "t", "u", "v", "w", "x", "y", "z",
];
const DELAY_MS: u64 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const FETCH_RETRIES: u32 = 1;
const DATABASE_PATH: &str = "redump_playstation.db";
const OUT_DIR: &str = "scrapped_files";
