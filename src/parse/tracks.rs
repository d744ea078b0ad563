use scraper::Html;

use super::{cell_text, create_selector};
use crate::{warn_time, Error, Result, Track};

/// Leading cells of the track table that belong to its caption row.
const LEADING_CELLS: usize = 2;
/// Cell positions of a single-track table, which has no per-row header.
const SINGLE_TRACK_CELLS: [(Field, usize); 8] = [
    (Field::Number, 2),
    (Field::Pregap, 4),
    (Field::Length, 5),
    (Field::Sectors, 6),
    (Field::Size, 7),
    (Field::Crc, 8),
    (Field::Md5, 9),
    (Field::Sha1, 10),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Number,
    Pregap,
    Length,
    Sectors,
    Size,
    Crc,
    Md5,
    Sha1,
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Field::Number => "track number",
            Field::Pregap => "pregap",
            Field::Length => "length",
            Field::Sectors => "sectors",
            Field::Size => "size",
            Field::Crc => "crc",
            Field::Md5 => "md5",
            Field::Sha1 => "sha1",
        }
    }
}

use Field::*;

const NINE_COLUMN: [Option<Field>; 9] = [
    Some(Number),
    None,
    Some(Pregap),
    Some(Length),
    Some(Sectors),
    Some(Size),
    Some(Crc),
    Some(Md5),
    Some(Sha1),
];

// Column 6 carries a filler cell, not the size.
const TEN_COLUMN: [Option<Field>; 10] = [
    Some(Number),
    None,
    None,
    Some(Pregap),
    Some(Length),
    Some(Sectors),
    None,
    Some(Crc),
    Some(Md5),
    Some(Sha1),
];

/// The two known shapes of a multi-track table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    NineColumn,
    TenColumn,
}

impl Layout {
    /// Maps the `colspan` of the first cell to a layout.
    pub fn from_column_count(columns: u32) -> Option<Self> {
        match columns {
            9 => Some(Layout::NineColumn),
            10 => Some(Layout::TenColumn),
            _ => None,
        }
    }

    pub fn width(self) -> usize {
        self.columns().len()
    }

    fn columns(self) -> &'static [Option<Field>] {
        match self {
            Layout::NineColumn => &NINE_COLUMN,
            Layout::TenColumn => &TEN_COLUMN,
        }
    }

    fn has_size(self) -> bool {
        self.columns().contains(&Some(Size))
    }
}

/// Raw `<td>` texts of the `tracks` table plus the declared column count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTable {
    pub cells: Vec<String>,
    /// `colspan` of the first cell, 0 when missing or not a number.
    pub column_count: u32,
}

impl TrackTable {
    pub fn tracks(&self, track_count: u32) -> Result<Vec<Track>> {
        parse_tracks(&self.cells, track_count, self.column_count)
    }
}

/// Collects the cells of the detail page's `tracks` table.
pub fn track_table(html: &str) -> Result<TrackTable> {
    let doc = Html::parse_document(html);
    let table_selector = create_selector(r#"table[class="tracks"]"#)?;
    let td_selector = create_selector("td")?;

    let table = doc
        .select(&table_selector)
        .next()
        .ok_or_else(|| Error::ParseMissingSelector("table.tracks".into()))?;

    let mut column_count = 0;
    let mut cells = Vec::new();
    for (i, td) in table.select(&td_selector).enumerate() {
        if i == 0 {
            column_count = td
                .value()
                .attr("colspan")
                .and_then(|c| c.trim().parse().ok())
                .unwrap_or(0);
        }
        cells.push(cell_text(td));
    }
    Ok(TrackTable {
        cells,
        column_count,
    })
}

/// Turns the track table cells into one `Track` per row.
///
/// A single track, or a table without a usable column count (0), is read from
/// fixed cell positions. Otherwise the caption cells are dropped and the rest
/// is walked row by row; a row ends at its sha1 cell. Cells past the last
/// track row (the totals row) are ignored.
pub fn parse_tracks(cells: &[String], track_count: u32, column_count: u32) -> Result<Vec<Track>> {
    if track_count <= 1 {
        return parse_single_track(cells).map(|t| vec![t]);
    }
    let layout = match column_count {
        0 => {
            warn_time!(
                "LAYOUT",
                "{track_count} tracks but no column count, reading a single track"
            );
            return parse_single_track(cells).map(|t| vec![t]);
        }
        columns => Layout::from_column_count(columns).ok_or(Error::UnknownLayout { columns })?,
    };

    let width = layout.width();
    let body = cells.get(LEADING_CELLS..).unwrap_or_default();
    let expected = track_count as usize * width;
    if body.len() < expected {
        return Err(Error::TrackTableShape {
            tracks: track_count,
            expected: expected + LEADING_CELLS,
            found: cells.len(),
        });
    }

    let mut tracks = Vec::with_capacity(track_count as usize);
    for (row_idx, row_cells) in body.chunks_exact(width).take(track_count as usize).enumerate() {
        let mut row = Row::default();
        for (field, text) in layout.columns().iter().zip(row_cells) {
            let Some(field) = *field else { continue };
            row.set(field, text);
            if field == Sha1 {
                tracks.push(row.finish(row_idx, layout.has_size())?);
                row = Row::default();
            }
        }
    }
    Ok(tracks)
}

fn parse_single_track(cells: &[String]) -> Result<Track> {
    let needed = SINGLE_TRACK_CELLS.iter().map(|(_, i)| i + 1).max().unwrap_or(0);
    if cells.len() < needed {
        return Err(Error::TrackTableShape {
            tracks: 1,
            expected: needed,
            found: cells.len(),
        });
    }
    let mut row = Row::default();
    for (field, idx) in SINGLE_TRACK_CELLS {
        row.set(field, &cells[idx]);
    }
    row.finish(0, true)
}

/// One track row being filled in, indexed by `Field`.
#[derive(Debug, Default)]
struct Row([Option<String>; 8]);

impl Row {
    fn set(&mut self, field: Field, text: &str) {
        self.0[field as usize] = Some(text.to_string());
    }

    fn take(&mut self, row: usize, field: Field) -> Result<String> {
        self.0[field as usize]
            .take()
            .ok_or(Error::IncompleteTrackRow {
                row,
                field: field.name(),
            })
    }

    fn finish(mut self, row: usize, has_size: bool) -> Result<Track> {
        let number = self.take(row, Number)?;
        let number = number
            .trim()
            .parse()
            .map_err(|_| Error::InvalidTrackNumber(number))?;
        Ok(Track {
            number,
            pregap: self.take(row, Pregap)?,
            length: self.take(row, Length)?,
            sectors: self.take(row, Sectors)?,
            size: if has_size {
                self.take(row, Size)?
            } else {
                String::new()
            },
            crc: self.take(row, Crc)?,
            md5: self.take(row, Md5)?,
            sha1: self.take(row, Sha1)?,
        })
    }
}
