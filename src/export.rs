//! Human readable output: the console report and the per-title text files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tokio::{fs, io::AsyncWriteExt};

use crate::{Result, Title, Totals, Track};

const TRACK_HEADERS: [&str; 8] = [
    "Track", "Pregap", "Length", "Sectors", "Size", "CRC", "MD5", "SHA1",
];
const TOTAL_HEADERS: [&str; 4] = ["Total Length", "Total Sectors", "Total Size", "Total CRC"];

#[inline]
fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Title block, track table and (for multi-track titles) the totals table.
pub fn format_report(title: &Title, tracks: &[Track], totals: Option<&Totals>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Game Name: {}", title.name);
    let _ = writeln!(out, "Game ID: {}", title.id);
    let _ = writeln!(out, "Release Date: {}", title.release_date);
    let _ = writeln!(out, "EDC: {}", yes_no(title.has_edc));
    let _ = writeln!(out, "Anti Modchip: {}", yes_no(title.has_anti_modchip));
    let _ = writeln!(out, "Libcrypt: {}", yes_no(title.has_libcrypt));
    let _ = writeln!(out, "Tracks: {}", title.track_count);

    if !tracks.is_empty() {
        let rows: Vec<Vec<String>> = tracks
            .iter()
            .map(|t| {
                vec![
                    t.number.to_string(),
                    t.pregap.clone(),
                    t.length.clone(),
                    t.sectors.clone(),
                    t.size.clone(),
                    t.crc.clone(),
                    t.md5.clone(),
                    t.sha1.clone(),
                ]
            })
            .collect();
        out.push_str(&table(&TRACK_HEADERS, &rows));
    }
    if let Some(totals) = totals {
        let row = vec![
            totals.length_total.clone(),
            totals.sectors_total.clone(),
            totals.size_total.clone(),
            totals.crc_total.clone(),
        ];
        out.push_str(&table(&TOTAL_HEADERS, &[row]));
    }
    out
}

/// Left aligned columns, two spaces apart, dashes under the headers.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain([h.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = table_line(headers.iter().copied(), &widths);
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&table_line(dashes.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

/// The text stored in `{id}.txt`.
pub fn format_record(title: &Title, tracks: &[Track], totals: Option<&Totals>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name: {}", title.name);
    let _ = writeln!(out, "ID: {}", title.id);
    let _ = writeln!(out, "Date: {}", title.release_date);
    let _ = writeln!(out, "EDC: {}", yes_no(title.has_edc));
    let _ = writeln!(out, "Anti-Mod: {}", yes_no(title.has_anti_modchip));
    let _ = writeln!(out, "Libcrypt: {}", yes_no(title.has_libcrypt));
    let _ = writeln!(out, "Number of Tracks: {}", tracks.len());
    for t in tracks {
        let _ = writeln!(out, "Track Number: {}", t.number);
        let _ = writeln!(out, "Track Pregap: {}", t.pregap);
        let _ = writeln!(out, "Track Length: {}", t.length);
        let _ = writeln!(out, "Track Sectors: {}", t.sectors);
        let _ = writeln!(out, "Track Size: {}", t.size);
        let _ = writeln!(out, "Track CRC: {}", t.crc);
        let _ = writeln!(out, "Track MD5: {}", t.md5);
        let _ = writeln!(out, "Track SHA1: {}", t.sha1);
    }
    if let Some(totals) = totals {
        let _ = writeln!(out, "Total Length: {}", totals.length_total);
        let _ = writeln!(out, "Total Sectors: {}", totals.sectors_total);
        let _ = writeln!(out, "Total Size: {}", totals.size_total);
        let _ = writeln!(out, "Total CRC: {}", totals.crc_total);
    }
    out
}

/// Writes `{dir}/{id}.txt`, creating `dir` if needed. Returns the file path.
pub async fn write_record(
    dir: &Path,
    title: &Title,
    tracks: &[Track],
    totals: Option<&Totals>,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.txt", title.id));
    let mut file = fs::File::create(&path).await?;
    file.write_all(format_record(title, tracks, totals).as_bytes())
        .await?;
    file.flush().await?;
    Ok(path)
}
