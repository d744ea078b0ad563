use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Couldn't fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Detail table has no cell at index {index} ({field})")]
    MissingDetailField { field: &'static str, index: usize },
    #[error("Detail table has no header labelled {0:?}")]
    HeaderNotFound(&'static str),
    #[error("Invalid track count: {0:?}")]
    InvalidTrackCount(String),
    #[error("Title id is empty after normalization (raw: {0:?})")]
    EmptyTitleId(String),
    #[error("Invalid track number: {0:?}")]
    InvalidTrackNumber(String),
    #[error("Track table too short: {tracks} tracks need {expected} cells, found {found}")]
    TrackTableShape {
        tracks: u32,
        expected: usize,
        found: usize,
    },
    #[error("Track table has {columns} columns, expected 9 or 10")]
    UnknownLayout { columns: u32 },
    #[error("Track row {row} is missing its {field} cell")]
    IncompleteTrackRow { row: usize, field: &'static str },

    #[error("Storage Error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// Faults confined to a single detail page. The crawl logs them and moves
    /// on to the next title; everything else ends the run.
    pub fn is_title_fault(&self) -> bool {
        matches!(
            self,
            Error::ParseMissingSelector(_)
                | Error::MissingDetailField { .. }
                | Error::HeaderNotFound(_)
                | Error::InvalidTrackCount(_)
                | Error::EmptyTitleId(_)
                | Error::InvalidTrackNumber(_)
                | Error::TrackTableShape { .. }
                | Error::IncompleteTrackRow { .. }
                | Error::UnknownLayout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defects_are_title_faults() {
        assert!(Error::HeaderNotFound("Number of tracks").is_title_fault());
        assert!(Error::TrackTableShape {
            tracks: 2,
            expected: 18,
            found: 9
        }
        .is_title_fault());
        assert!(Error::UnknownLayout { columns: 11 }.is_title_fault());
        assert!(!Error::Io(std::io::Error::other("disk")).is_title_fault());
    }
}
