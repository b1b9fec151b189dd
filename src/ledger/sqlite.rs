//! SQLite-backed redirect store.

use crate::domain::Slug;
use crate::ledger::{RedirectRecord, RedirectStore, StoreError, StoreResult, create_schema};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;

// ===========================================
// SqliteRedirectStore Struct
// ===========================================

/// SQLite-backed redirect store.
///
/// Owns the database connection; the schema is created on open. The
/// ledger's mutation steps run inside one SQLite transaction via the
/// overridden [`RedirectStore::in_transaction`].
#[derive(Debug)]
pub struct SqliteRedirectStore {
    conn: Connection,
}

impl SqliteRedirectStore {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens an in-memory store with the redirect schema.
    ///
    /// Useful for testing and for hosts that rebuild their ledger on boot.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens or creates a store at the given path.
    ///
    /// Creates parent directories if they don't exist. Initializes the
    /// schema if this is a new database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===========================================
    // Connection Accessors
    // ===========================================

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying SQLite connection.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

// ===========================================
// Row Mapping
// ===========================================

const SELECT_COLUMNS: &str = "record_type, former_slug, current_slug, created_at, updated_at";

type RawRow = (String, String, String, String, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
        row.get::<_, String>(4)?,
    ))
}

fn record_from_row(raw: RawRow) -> StoreResult<RedirectRecord> {
    let (record_type, former, current, created, updated) = raw;

    let former_slug = Slug::new(&former).map_err(|e| StoreError::InvalidRow {
        former: former.clone(),
        reason: format!("invalid former slug: {}", e),
    })?;
    let current_slug = Slug::new(&current).map_err(|e| StoreError::InvalidRow {
        former: former.clone(),
        reason: format!("invalid current slug: {}", e),
    })?;
    let created_at = parse_timestamp(&former, "created_at", &created)?;
    let updated_at = parse_timestamp(&former, "updated_at", &updated)?;

    Ok(RedirectRecord::from_parts(
        record_type,
        former_slug,
        current_slug,
        created_at,
        updated_at,
    ))
}

fn parse_timestamp(former: &str, column: &str, value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidRow {
            former: former.to_string(),
            reason: format!("invalid {} timestamp: {}", column, e),
        })
}

// ===========================================
// RedirectStore Implementation
// ===========================================

impl RedirectStore for SqliteRedirectStore {
    fn find(&self, record_type: &str, former: &str) -> StoreResult<Option<RedirectRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM redirects WHERE record_type = ?1 AND former_slug = ?2",
            SELECT_COLUMNS
        ))?;

        match stmt.query_row(params![record_type, former], read_row) {
            Ok(raw) => Ok(Some(record_from_row(raw)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    fn all_for(&self, record_type: &str) -> StoreResult<Vec<RedirectRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM redirects WHERE record_type = ?1 ORDER BY id",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map([record_type], read_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(record_from_row(row?)?);
        }
        Ok(records)
    }

    fn insert(&mut self, record: RedirectRecord) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO redirects (record_type, former_slug, current_slug, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.record_type(),
                record.former_slug().as_str(),
                record.current_slug().as_str(),
                record.created_at().to_rfc3339(),
                record.updated_at().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete_by_former(&mut self, record_type: &str, former: &str) -> StoreResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM redirects WHERE record_type = ?1 AND former_slug = ?2",
            params![record_type, former],
        )?;
        Ok(deleted)
    }

    fn repoint_current(&mut self, record_type: &str, from: &str, to: &str) -> StoreResult<usize> {
        let moved = self.conn.execute(
            "UPDATE redirects SET current_slug = ?3, updated_at = ?4
             WHERE record_type = ?1 AND current_slug = ?2",
            params![record_type, from, to, Utc::now().to_rfc3339()],
        )?;
        Ok(moved)
    }

    fn delete_record_type(&mut self, record_type: &str) -> StoreResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM redirects WHERE record_type = ?1",
            [record_type],
        )?;
        Ok(deleted)
    }

    fn in_transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> StoreResult<T>) -> StoreResult<T> {
        self.conn.execute_batch("BEGIN")?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(err) => {
                // Attempt rollback, but surface the original error
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(err)
            }
        }
    }
}
