use std::path::Path;

use rusqlite::{params, Connection};

use crate::{Result, Title, Totals, Track};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY,
    game_id VARCHAR(10) NOT NULL UNIQUE,
    name VARCHAR(200) NOT NULL,
    release_date VARCHAR(20),
    edc BOOL,
    anti_mod BOOL,
    libcrypt BOOL,
    num_of_tracks INT
);

CREATE TABLE IF NOT EXISTS tracks (
    id INTEGER PRIMARY KEY,
    game_id VARCHAR(10) NOT NULL,
    track_number INT NOT NULL,
    pregap VARCHAR(30) NOT NULL,
    length VARCHAR(30) NOT NULL,
    sectors VARCHAR(30) NOT NULL,
    size VARCHAR(30) NOT NULL,
    crc VARCHAR(30) NOT NULL,
    md5 VARCHAR(60) NOT NULL,
    sha VARCHAR(60) NOT NULL,
    FOREIGN KEY (game_id) REFERENCES games (game_id)
);

CREATE TABLE IF NOT EXISTS track_totals (
    id INTEGER PRIMARY KEY,
    game_id VARCHAR(10) NOT NULL,
    length_total VARCHAR(30) NOT NULL,
    sectors_total VARCHAR(30) NOT NULL,
    size_total VARCHAR(30) NOT NULL,
    crc_total VARCHAR(30) NOT NULL,
    FOREIGN KEY (game_id) REFERENCES games (game_id)
);
"#;

/// Where finished titles end up.
pub trait Store {
    fn create_schema(&mut self) -> Result<()>;
    /// `track_count` is the number of tracks actually parsed for the title.
    fn save_title(&mut self, title: &Title, track_count: usize) -> Result<()>;
    fn save_track(&mut self, title_id: &str, track: &Track) -> Result<()>;
    fn save_totals(&mut self, title_id: &str, totals: &Totals) -> Result<()>;

    /// Title first, then every track, then the totals if there are any.
    fn save(&mut self, title: &Title, tracks: &[Track], totals: Option<&Totals>) -> Result<()> {
        self.save_title(title, tracks.len())?;
        for track in tracks {
            self.save_track(&title.id, track)?;
        }
        if let Some(totals) = totals {
            self.save_totals(&title.id, totals)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Store for SqliteStore {
    fn create_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn save_title(&mut self, title: &Title, track_count: usize) -> Result<()> {
        insert_title(&self.conn, title, track_count)
    }

    fn save_track(&mut self, title_id: &str, track: &Track) -> Result<()> {
        insert_track(&self.conn, title_id, track)
    }

    fn save_totals(&mut self, title_id: &str, totals: &Totals) -> Result<()> {
        insert_totals(&self.conn, title_id, totals)
    }

    /// Same sequence as the default, inside one transaction so a rejected
    /// title leaves no orphaned tracks behind.
    fn save(&mut self, title: &Title, tracks: &[Track], totals: Option<&Totals>) -> Result<()> {
        let tx = self.conn.transaction()?;
        insert_title(&tx, title, tracks.len())?;
        for track in tracks {
            insert_track(&tx, &title.id, track)?;
        }
        if let Some(totals) = totals {
            insert_totals(&tx, &title.id, totals)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn insert_title(conn: &Connection, title: &Title, track_count: usize) -> Result<()> {
    conn.execute(
        "INSERT INTO games (game_id, name, release_date, edc, anti_mod, libcrypt, num_of_tracks)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            title.id,
            title.name,
            title.release_date,
            title.has_edc,
            title.has_anti_modchip,
            title.has_libcrypt,
            track_count as i64,
        ],
    )?;
    Ok(())
}

fn insert_track(conn: &Connection, title_id: &str, track: &Track) -> Result<()> {
    conn.execute(
        "INSERT INTO tracks (game_id, track_number, pregap, length, sectors, size, crc, md5, sha)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            title_id,
            track.number,
            track.pregap,
            track.length,
            track.sectors,
            track.size,
            track.crc,
            track.md5,
            track.sha1,
        ],
    )?;
    Ok(())
}

fn insert_totals(conn: &Connection, title_id: &str, totals: &Totals) -> Result<()> {
    conn.execute(
        "INSERT INTO track_totals (game_id, length_total, sectors_total, size_total, crc_total)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            title_id,
            totals.length_total,
            totals.sectors_total,
            totals.size_total,
            totals.crc_total,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.create_schema().unwrap();
        store
    }

    fn title(id: &str) -> Title {
        Title {
            id: id.into(),
            name: "Mr. Tests Game".into(),
            release_date: "1999-01-01".into(),
            has_edc: true,
            has_anti_modchip: false,
            has_libcrypt: true,
            track_count: 2,
        }
    }

    fn track(number: u32) -> Track {
        Track {
            number,
            sha1: format!("sha{number}"),
            ..Track::default()
        }
    }

    fn count(store: &SqliteStore, table: &str) -> i64 {
        store
            .connection()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn saves_title_tracks_and_totals() {
        let mut store = store();
        let tracks = [track(1), track(2)];
        store
            .save(&title("SLUS_00001"), &tracks, Some(&Totals::zeroed()))
            .unwrap();

        assert_eq!(count(&store, "games"), 1);
        assert_eq!(count(&store, "tracks"), 2);
        assert_eq!(count(&store, "track_totals"), 1);

        let (edc, anti_mod, num): (bool, bool, i64) = store
            .connection()
            .query_row(
                "SELECT edc, anti_mod, num_of_tracks FROM games WHERE game_id = ?1",
                ["SLUS_00001"],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert!(edc && !anti_mod);
        assert_eq!(num, 2);
    }

    #[test]
    fn names_with_quotes_need_no_escaping() {
        let mut store = store();
        let mut t = title("SLUS_00002");
        t.name = r#"Mr. "Test"'s Game"#.into();
        store.save(&t, &[track(1)], None).unwrap();

        let name: String = store
            .connection()
            .query_row("SELECT name FROM games", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, t.name);
    }

    #[test]
    fn duplicate_title_is_rejected_without_leftovers() {
        let mut store = store();
        store.save(&title("SLUS_00003"), &[track(1)], None).unwrap();
        let res = store.save(&title("SLUS_00003"), &[track(1), track(2)], None);

        assert!(matches!(res, Err(crate::Error::Storage(_))));
        assert_eq!(count(&store, "games"), 1);
        assert_eq!(count(&store, "tracks"), 1);
    }

    #[test]
    fn tracks_need_an_existing_title() {
        let mut store = store();
        assert!(store.save_track("NOPE", &track(1)).is_err());
    }
}
