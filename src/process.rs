use std::sync::Arc;

use chrono::Local;
use tokio::task::spawn_blocking;

use crate::export::{format_report, write_record};
use crate::parse::{collect_links, parse_title, track_table};
use crate::request::{Fetch, HttpFetcher};
use crate::store::{SqliteStore, Store};
use crate::{info_time, warn_time, Config, Deduplicator, Result, Title, Totals};

/// What a finished crawl leaves behind.
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Every title id handed to the outputs.
    pub seen: Deduplicator,
    pub processed: usize,
    pub duplicates: usize,
    /// Titles skipped because their page didn't parse.
    pub defects: usize,
    pub store_failures: usize,
}

enum Outcome {
    Processed,
    Duplicate,
}

/// Runs the whole crawl with the real fetcher and whatever outputs `config` enables.
pub async fn process_site(config: Config) -> Result<()> {
    let start_time = Local::now();
    let fetcher = HttpFetcher::new(&config)?;

    let mut store = if config.store_data {
        // Every run starts from an empty database.
        if tokio::fs::try_exists(&config.database_path).await? {
            tokio::fs::remove_file(&config.database_path).await?;
        }
        let mut store = SqliteStore::open(&config.database_path)?;
        store.create_schema()?;
        Some(store)
    } else {
        None
    };

    info_time!("Started scraping {}", config.base_url);
    let report = crawl(&config, &fetcher, store.as_mut(), Deduplicator::new()).await?;
    info_time!(
        start_time,
        "Finished: {} processed, {} duplicates, {} defects, {} storage failures",
        report.processed,
        report.duplicates,
        report.defects,
        report.store_failures
    );
    Ok(())
}

/// Walks every shard in order, one request at a time.
///
/// Titles that fail to parse are logged and skipped, a failed fetch ends the
/// crawl. `seen` decides which title ids count as duplicates and is returned,
/// grown, inside the report.
pub async fn crawl<F: Fetch, S: Store>(
    config: &Config,
    fetcher: &F,
    mut store: Option<&mut S>,
    seen: Deduplicator,
) -> Result<CrawlReport> {
    let mut report = CrawlReport {
        seen,
        ..CrawlReport::default()
    };

    for shard in &config.shards {
        let start_shard_time = Local::now();
        let index_url = config.index_url(shard);
        let html = fetcher.fetch(&index_url).await.inspect_err(|err| {
            warn_time!("FATAL", "shard {shard}: {err}");
        })?;
        let links = spawn_blocking({
            let base_url = config.base_url.clone();
            move || collect_links(&html, &base_url)
        })
        .await??;
        info_time!("Shard {shard}: found {} detail links", links.len());

        for link in links {
            match process_title(config, fetcher, store.as_deref_mut(), &mut report, &link).await {
                Ok(Outcome::Processed) => {
                    report.processed += 1;
                    tokio::time::sleep(config.delay).await;
                }
                Ok(Outcome::Duplicate) => report.duplicates += 1,
                Err(err) if err.is_title_fault() => {
                    warn_time!("DEFECT", "{link}: {err}");
                    report.defects += 1;
                }
                Err(err) => {
                    warn_time!("FATAL", "shard {shard}, {link}: {err}");
                    return Err(err);
                }
            }
        }
        info_time!(start_shard_time, "Processed shard {}", shard);
    }
    Ok(report)
}

/// Fetches one detail page and sends its title through the outputs,
/// unless the title id was seen before.
async fn process_title<F: Fetch, S: Store>(
    config: &Config,
    fetcher: &F,
    store: Option<&mut S>,
    report: &mut CrawlReport,
    link: &str,
) -> Result<Outcome> {
    let html = Arc::new(fetcher.fetch(link).await?);

    let raw = spawn_blocking({
        let html = html.clone();
        move || parse_title(&html)
    })
    .await??;
    let title = Title::try_from(raw)?;

    if report.seen.is_seen(&title.id) {
        warn_time!("SKIP", "{} already processed ({link})", title.id);
        return Ok(Outcome::Duplicate);
    }

    let table = spawn_blocking(move || track_table(&html)).await??;
    let tracks = table.tracks(title.track_count)?;
    let totals = Totals::for_tracks(&tracks);

    if config.print_data {
        println!("{}\n", format_report(&title, &tracks, totals.as_ref()));
    } else {
        info_time!("Processed: {}", title.name);
    }

    if config.write_data {
        if let Err(err) = write_record(&config.out_dir, &title, &tracks, totals.as_ref()).await {
            warn_time!("EXPORT FAILED", "{}: {err}", title.id);
        }
    }

    if let Some(store) = store {
        if let Err(err) = store.save(&title, &tracks, totals.as_ref()) {
            warn_time!("STORE FAILED", "{}: {err}", title.id);
            report.store_failures += 1;
        }
    }

    report.seen.mark_seen(title.id);
    Ok(Outcome::Processed)
}
