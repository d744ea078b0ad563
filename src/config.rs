use std::path::PathBuf;
use std::time::Duration;

use crate::{
    BASE_URL, DATABASE_PATH, DELAY_MS, FETCH_RETRIES, OUT_DIR, PLATFORM, REQUEST_TIMEOUT_SECS,
    SHARDS,
};

/// Everything the crawl needs to know up front. `Default` gives the stock
/// redump PlayStation run.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub platform: String,
    pub shards: Vec<String>,
    /// Pause after every processed (non-duplicate) title.
    pub delay: Duration,
    pub request_timeout: Duration,
    /// Extra attempts after the first failed fetch.
    pub fetch_retries: u32,
    /// Print a full report per title to stdout.
    pub print_data: bool,
    /// Write one `{id}.txt` per title into `out_dir`.
    pub write_data: bool,
    /// Persist into the SQLite database at `database_path`.
    pub store_data: bool,
    pub database_path: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            platform: PLATFORM.to_string(),
            shards: SHARDS.iter().map(|s| s.to_string()).collect(),
            delay: Duration::from_millis(DELAY_MS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            fetch_retries: FETCH_RETRIES,
            print_data: false,
            write_data: false,
            store_data: true,
            database_path: PathBuf::from(DATABASE_PATH),
            out_dir: PathBuf::from(OUT_DIR),
        }
    }
}

impl Config {
    pub fn index_url(&self, shard: &str) -> String {
        format!(
            "{}/discs/system/{}/letter/{shard}/",
            self.base_url.trim_end_matches('/'),
            self.platform
        )
    }
}
