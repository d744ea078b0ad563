use scraper::Html;

use super::{cell_text, create_selector};
use crate::{model::RawTitle, Error, Result};

/// Where a detail field lives in the `gameinfo` table.
#[derive(Debug, Clone, Copy)]
enum Locate {
    /// Fixed index into the table's data cells.
    Cell(usize),
    /// Data cell at the same index as the header with this exact label.
    Header(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct FieldRule {
    name: &'static str,
    locate: Locate,
}

const ID: FieldRule = FieldRule {
    name: "serial",
    locate: Locate::Cell(5),
};
const RELEASE_DATE: FieldRule = FieldRule {
    name: "release date",
    locate: Locate::Cell(6),
};
const EDC: FieldRule = FieldRule {
    name: "edc",
    locate: Locate::Cell(8),
};
const ANTI_MODCHIP: FieldRule = FieldRule {
    name: "anti-modchip",
    locate: Locate::Cell(9),
};
const LIBCRYPT: FieldRule = FieldRule {
    name: "libcrypt",
    locate: Locate::Cell(10),
};
// Moves by one row depending on which optional rows the page has. If the
// label repeats, the last one wins.
const TRACK_COUNT: FieldRule = FieldRule {
    name: "track count",
    locate: Locate::Header("Number of tracks"),
};

/// Pulls the title name (`<h1>`) and the `gameinfo` fields out of a detail
/// page. Values are returned untouched, see `Title::try_from` for cleanup.
pub fn parse_title(html: &str) -> Result<RawTitle> {
    let doc = Html::parse_document(html);

    let h1_selector = create_selector("h1")?;
    let table_selector = create_selector(r#"table[class="gameinfo"]"#)?;
    let th_selector = create_selector("th")?;
    let td_selector = create_selector("td")?;

    let name = doc
        .select(&h1_selector)
        .next()
        .map(cell_text)
        .ok_or_else(|| Error::ParseMissingSelector("h1".into()))?;
    let table = doc
        .select(&table_selector)
        .next()
        .ok_or_else(|| Error::ParseMissingSelector("table.gameinfo".into()))?;

    let headers: Vec<String> = table.select(&th_selector).map(cell_text).collect();
    let cells: Vec<String> = table.select(&td_selector).map(cell_text).collect();

    let field = |rule: FieldRule| -> Result<String> {
        let index = match rule.locate {
            Locate::Cell(index) => index,
            Locate::Header(label) => headers
                .iter()
                .rposition(|h| h.trim() == label)
                .ok_or(Error::HeaderNotFound(label))?,
        };
        cells
            .get(index)
            .cloned()
            .ok_or(Error::MissingDetailField {
                field: rule.name,
                index,
            })
    };

    Ok(RawTitle {
        name,
        id: field(ID)?,
        release_date: field(RELEASE_DATE)?,
        edc: field(EDC)?,
        anti_modchip: field(ANTI_MODCHIP)?,
        libcrypt: field(LIBCRYPT)?,
        track_count: field(TRACK_COUNT)?,
    })
}
