use crate::{Error, Result};

/// One catalog entry: a disc and its protection flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub id: String,
    pub name: String,
    pub release_date: String,
    pub has_edc: bool,
    pub has_anti_modchip: bool,
    pub has_libcrypt: bool,
    pub track_count: u32,
}

/// Title fields exactly as they appear on the detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTitle {
    pub name: String,
    pub id: String,
    pub release_date: String,
    pub edc: String,
    pub anti_modchip: String,
    pub libcrypt: String,
    pub track_count: String,
}

impl TryFrom<RawTitle> for Title {
    type Error = Error;

    fn try_from(raw: RawTitle) -> Result<Self> {
        let id = normalize_title_id(&raw.id);
        if id.is_empty() {
            return Err(Error::EmptyTitleId(raw.id));
        }
        Ok(Title {
            id,
            name: sanitize_title_name(&raw.name),
            release_date: raw.release_date,
            has_edc: is_yes(&raw.edc),
            has_anti_modchip: is_yes(&raw.anti_modchip),
            has_libcrypt: is_yes(&raw.libcrypt),
            track_count: parse_track_count(&raw.track_count)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub number: u32,
    pub pregap: String,
    pub length: String,
    pub sectors: String,
    /// Empty for the 10 column layout, which has no size cell.
    pub size: String,
    pub crc: String,
    pub md5: String,
    pub sha1: String,
}

/// Aggregates over all tracks of a multi-track title.
///
/// The site shows real totals, but they are never scraped: every field stays
/// `"0"`, which is what existing databases built by this tool contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub length_total: String,
    pub sectors_total: String,
    pub size_total: String,
    pub crc_total: String,
}

impl Totals {
    pub fn zeroed() -> Self {
        Self {
            length_total: "0".into(),
            sectors_total: "0".into(),
            size_total: "0".into(),
            crc_total: "0".into(),
        }
    }

    /// Totals only exist for titles with more than one track.
    pub fn for_tracks(tracks: &[Track]) -> Option<Self> {
        (tracks.len() > 1).then(Self::zeroed)
    }
}

/// Keeps the first of several comma separated ids and swaps spaces and
/// hyphens for underscores.
pub fn normalize_title_id(raw: &str) -> String {
    let first = raw.split(',').next().unwrap_or_default();
    first.replace([' ', '-'], "_")
}

/// Drops single and double quotes, nothing else.
pub fn sanitize_title_name(raw: &str) -> String {
    raw.replace(['"', '\''], "")
}

pub(crate) fn parse_track_count(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidTrackCount(raw.to_string())),
    }
}

#[inline]
fn is_yes(flag: &str) -> bool {
    flag == "Yes"
}
