//! SQLite DDL definitions for the result store.
//!
//! All `CREATE TABLE` / `CREATE INDEX` statements live here so they are
//! reviewable and testable in isolation.

use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;

/// Complete DDL for the result database.
///
/// Uses `IF NOT EXISTS` throughout so `apply_schema` is idempotent.
pub(crate) const SCHEMA_SQL: &str = r#"
-- Enable WAL mode for concurrent reads during writes.
PRAGMA journal_mode = WAL;

-- Schema version tracking.
CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- One row per (query, url) of the latest fetch batch for that query.
-- AUTOINCREMENT keeps ids from being reused after a replace deletes rows.
CREATE TABLE IF NOT EXISTS search_results (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    query          TEXT    NOT NULL,
    url            TEXT    NOT NULL,
    title          TEXT,
    snippet        TEXT,
    display_link   TEXT,
    position       INTEGER NOT NULL,
    fetched_at_utc TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_results_query ON search_results(query);
CREATE INDEX IF NOT EXISTS idx_results_url   ON search_results(url);
"#;

/// Apply the full schema to an open connection.
///
/// Safe to call multiple times; all statements use `IF NOT EXISTS`.
/// Inserts the current schema version into `schema_meta` if not already
/// present.
pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let version_str = super::types::CURRENT_SCHEMA_VERSION.to_string();
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        rusqlite::params![version_str],
    )?;

    Ok(())
}

/// Register the scalar SQL functions the store's queries rely on.
///
/// `fold_case(text)` returns the Unicode lowercase of `text` (NULL stays
/// NULL). SQLite's own `lower()` and `LIKE` fold ASCII only.
pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| super::types::fold_case(&t)))
        },
    )
}

/// Read the current schema version from the database.
///
/// Returns `None` if the `schema_meta` table is empty or the key is missing.
pub(crate) fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_meta WHERE key = 'schema_version'")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().ok())
        }
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
