use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::source::{NetworkRow, ObservationRow, QuerySource};

const REQUIRED_TABLES: [&str; 2] = ["network", "location"];

const COUNT_NETWORKS: &str = "SELECT COUNT(*) FROM network WHERE lastlat != 0 AND lastlon != 0";

const NETWORK_PAGE: &str = "SELECT COALESCE(type, 'W'), lastlat, lastlon, bestlevel, ssid, bssid, \
     lasttime, frequency, capabilities \
     FROM network WHERE lastlat != 0 AND lastlon != 0 \
     ORDER BY lasttime DESC, bssid LIMIT ?1 OFFSET ?2";

const COUNT_OBSERVATIONS: &str = "SELECT COUNT(*) FROM location WHERE lat != 0 AND lon != 0";

// The join only supplies the radio type; the bssid is not selected.
const OBSERVATION_PAGE: &str = "SELECT l._id, l.lat, l.lon, l.level, COALESCE(n.type, 'W'), l.time \
     FROM location l LEFT JOIN network n ON n.bssid = l.bssid \
     WHERE l.lat != 0 AND l.lon != 0 AND l._id > ?1 AND l._id % ?2 = 0 \
     ORDER BY l._id LIMIT ?3";

pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(IngestError::Source(format!("no database at {}", path.display())));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        for table in REQUIRED_TABLES {
            let found: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get(0),
            )?;
            if found == 0 {
                return Err(IngestError::Source(format!("missing table `{}`", table)));
            }
        }
        Ok(SqliteSource { conn })
    }
}

impl QuerySource for SqliteSource {
    fn count_networks(&mut self) -> Result<usize> {
        let n: i64 = self.conn.query_row(COUNT_NETWORKS, [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }

    fn network_page(&mut self, offset: usize, limit: usize) -> Result<Vec<NetworkRow>> {
        let mut stmt = self.conn.prepare_cached(NETWORK_PAGE)?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], network_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(offset, rows = rows.len(), "network page");
        Ok(rows)
    }

    fn count_observations(&mut self) -> Result<usize> {
        let n: i64 = self.conn.query_row(COUNT_OBSERVATIONS, [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }

    fn observation_page(&mut self, stride: usize, after: i64, limit: usize) -> Result<Vec<ObservationRow>> {
        let mut stmt = self.conn.prepare_cached(OBSERVATION_PAGE)?;
        let rows = stmt
            .query_map(
                params![after, stride.max(1) as i64, limit as i64],
                observation_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(after, stride, rows = rows.len(), "observation page");
        Ok(rows)
    }
}

fn network_row(row: &Row<'_>) -> rusqlite::Result<NetworkRow> {
    let frequency: Option<i64> = row.get(7)?;
    Ok(NetworkRow {
        radio_type: row.get(0)?,
        lat: row.get(1)?,
        lon: row.get(2)?,
        level: row.get::<_, Option<i32>>(3)?.unwrap_or(0),
        ssid: lossy_text(row, 4)?,
        bssid: row.get(5)?,
        last_seen: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
        frequency: frequency.and_then(|f| u32::try_from(f).ok()).filter(|f| *f > 0),
        capabilities: lossy_text(row, 8)?,
    })
}

// Scanners store raw SSID bytes, which are not always valid UTF-8.
fn lossy_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    })
}

fn observation_row(row: &Row<'_>) -> rusqlite::Result<ObservationRow> {
    Ok(ObservationRow {
        ordinal: row.get(0)?,
        lat: row.get(1)?,
        lon: row.get(2)?,
        level: row.get::<_, Option<i32>>(3)?.unwrap_or(0),
        radio_type: row.get(4)?,
        time: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
    })
}
