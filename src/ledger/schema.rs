//! SQLite schema creation for the redirect ledger.

use rusqlite::Connection;

/// Creates the redirect ledger schema.
///
/// This function creates all required tables and indexes. It is idempotent -
/// calling it multiple times is safe.
///
/// # Tables Created
/// - `redirects` - One row per live former-slug mapping
/// - `schema_version` - Schema version tracking
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS redirects (
            id INTEGER PRIMARY KEY,
            record_type TEXT NOT NULL,
            former_slug TEXT NOT NULL,
            current_slug TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )?;

    // Lookups come in by former slug; repointing scans by current slug.
    // Neither index is UNIQUE: the ledger's delete-before-insert ordering
    // owns the one-entry-per-former guarantee.
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_redirects_former
             ON redirects(record_type, former_slug);
         CREATE INDEX IF NOT EXISTS idx_redirects_current
             ON redirects(record_type, current_slug);",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'))",
        [],
    )?;

    Ok(())
}

/// Returns the current schema version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get(0)
    })
}
