//! SQLite-backed per-query result cache.
//!
//! Stores the latest fetch batch for each query in a single table. A
//! replace swaps one query's batch inside one transaction, so readers see
//! either the complete old batch or the complete new one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use web_search::ResultItem;

use super::schema::{apply_schema, read_schema_version, register_functions};
use super::types::{
    CacheHit, MAX_DISPLAY_LINK_CHARS, MAX_QUERY_CHARS, MAX_TITLE_CHARS, MAX_URL_CHARS,
    QuerySummary, StoredResult, fold_case, normalize_query, truncate_chars,
};
use crate::similarity::{MatchTier, match_tier};

const SELECT_COLUMNS: &str = "SELECT id, query, url, title, snippet, display_link, position, \
                              fetched_at_utc FROM search_results";

/// Substring predicate over every searchable column; `?1` is the case-folded term.
const CONTAINS_ANY_FIELD: &str = "(instr(fold_case(query), ?1) > 0 \
                                  OR instr(fold_case(title), ?1) > 0 \
                                  OR instr(fold_case(url), ?1) > 0 \
                                  OR instr(fold_case(snippet), ?1) > 0)";

/// SQLite-backed result cache.
///
/// The connection sits behind an async mutex; each operation holds it for
/// its whole duration, so every replace is one serialized transaction.
pub struct ResultCache {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl ResultCache {
    /// Open (or create) the database file at `path`.
    ///
    /// Creates parent directories and applies the schema if the database
    /// is new.
    pub fn open(path: &Path) -> Result<Self, ResultStoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ResultStoreError::Io(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        register_functions(&conn)?;
        apply_schema(&conn)?;
        tracing::debug!(path = %path.display(), "result store opened");
        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, ResultStoreError> {
        let conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        apply_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the current schema version from the database.
    pub async fn schema_version(&self) -> Result<Option<u32>, ResultStoreError> {
        let conn = self.lock().await;
        Ok(read_schema_version(&conn)?)
    }

    /// Replace every stored row for `query` with `items`.
    ///
    /// Deletes the previous batch and inserts the new one in a single
    /// transaction. All new rows share one `fetched_at_utc`, taken when the
    /// call starts, and keep the positions given in `items`. Returns the
    /// number of rows inserted.
    ///
    /// # Errors
    ///
    /// - [`ResultStoreError::InvalidInput`] for a blank or over-long query, or
    ///   an over-long URL. Nothing is written.
    /// - [`ResultStoreError::Cancelled`] if `cancel` fires before commit.
    /// - [`ResultStoreError::Sqlite`] on any store failure.
    ///
    /// On every error the previously stored rows are left untouched.
    pub async fn replace(
        &self,
        query: &str,
        items: &[ResultItem],
        cancel: &CancellationToken,
    ) -> Result<usize, ResultStoreError> {
        let fetched_at = Utc::now();
        let query = validate_query(query)?;
        if let Some(item) = items
            .iter()
            .find(|i| i.url.chars().count() > MAX_URL_CHARS)
        {
            return Err(ResultStoreError::InvalidInput(format!(
                "url at position {} exceeds {MAX_URL_CHARS} characters",
                item.position
            )));
        }

        let mut conn = self.lock().await;
        // Dropping `tx` on any early return rolls the transaction back.
        let tx = conn.transaction()?;

        let deleted = tx.execute("DELETE FROM search_results WHERE query = ?1", params![query])?;
        if cancel.is_cancelled() {
            return Err(ResultStoreError::Cancelled);
        }

        {
            let mut insert = tx.prepare(
                "INSERT INTO search_results \
                 (query, url, title, snippet, display_link, position, fetched_at_utc) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for item in items {
                let title = item
                    .title
                    .as_deref()
                    .map(|t| truncate_chars(t, MAX_TITLE_CHARS));
                let display_link = item
                    .display_link
                    .as_deref()
                    .map(|d| truncate_chars(d, MAX_DISPLAY_LINK_CHARS));
                insert.execute(params![
                    query,
                    item.url,
                    title,
                    item.snippet,
                    display_link,
                    item.position,
                    fetched_at
                ])?;
            }
        }

        if cancel.is_cancelled() {
            return Err(ResultStoreError::Cancelled);
        }
        tx.commit()?;

        tracing::debug!(deleted, inserted = items.len(), "results replaced");
        tracing::trace!(query, "replace committed");
        Ok(items.len())
    }

    /// All live rows for `query`, ordered by position.
    ///
    /// Returns an empty list when nothing is stored for it.
    pub async fn get_for_query(&self, query: &str) -> Result<Vec<StoredResult>, ResultStoreError> {
        let query = normalize_query(query);
        let conn = self.lock().await;
        rows_for_query(&conn, query)
    }

    /// Rows whose query, title, URL or snippet contains `like_term`.
    ///
    /// Matching is a literal substring match after Unicode lowercasing of
    /// both sides, so `über` finds `Über`. A blank term returns an empty list.
    ///
    /// Ordering:
    /// - with `query`: restricted to that query, by position ascending
    /// - without: across all queries, most recently inserted first
    pub async fn filter(
        &self,
        query: Option<&str>,
        like_term: &str,
    ) -> Result<Vec<StoredResult>, ResultStoreError> {
        let term = like_term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = fold_case(term);
        let query = query.map(normalize_query).filter(|q| !q.is_empty());

        let conn = self.lock().await;
        let rows = match query {
            Some(q) => {
                let sql = format!(
                    "{SELECT_COLUMNS} WHERE query = ?2 AND {CONTAINS_ANY_FIELD} \
                     ORDER BY position ASC, id ASC"
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![pattern, q], row_to_result)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!("{SELECT_COLUMNS} WHERE {CONTAINS_ANY_FIELD} ORDER BY id DESC");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![pattern], row_to_result)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        tracing::debug!(count = rows.len(), scoped = query.is_some(), "filter complete");
        Ok(rows)
    }

    /// Live rows for the exact (trimmed) query, or `None` on a miss.
    ///
    /// No fuzzy matching is done; see [`ResultCache::suggest_queries`] for
    /// similar stored queries.
    pub async fn try_get_cached(&self, query: &str) -> Result<Option<CacheHit>, ResultStoreError> {
        let query = normalize_query(query);
        if query.is_empty() {
            return Ok(None);
        }
        let conn = self.lock().await;
        let rows = rows_for_query(&conn, query)?;
        if rows.is_empty() {
            tracing::trace!(query, "cache miss");
            return Ok(None);
        }
        tracing::trace!(query, rows = rows.len(), "cache hit");
        Ok(Some(CacheHit {
            query: query.to_owned(),
            rows,
        }))
    }

    /// Every stored query with its row count and fetch time, most recent first.
    pub async fn cached_queries(&self) -> Result<Vec<QuerySummary>, ResultStoreError> {
        let conn = self.lock().await;
        let mut stmt = conn.prepare(
            "SELECT query, COUNT(*), MAX(fetched_at_utc) AS latest FROM search_results \
             GROUP BY query ORDER BY latest DESC, query ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let count: i64 = row.get(1)?;
            Ok(QuerySummary {
                query: row.get(0)?,
                result_count: usize::try_from(count).unwrap_or_default(),
                fetched_at_utc: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Stored queries similar to `input`, best tier first, then alphabetical.
    ///
    /// Unrelated queries are left out. A blank input suggests nothing.
    pub async fn suggest_queries(
        &self,
        input: &str,
        limit: usize,
    ) -> Result<Vec<(String, MatchTier)>, ResultStoreError> {
        let input = normalize_query(input);
        if input.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let conn = self.lock().await;
        let mut stmt = conn.prepare("SELECT DISTINCT query FROM search_results")?;
        let queries = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut ranked: Vec<(String, MatchTier)> = queries
            .into_iter()
            .map(|q| {
                let tier = match_tier(input, &q);
                (q, tier)
            })
            .filter(|(_, tier)| *tier != MatchTier::Unrelated)
            .collect();
        ranked.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

/// Errors from the result store.
#[derive(Debug, thiserror::Error)]
pub enum ResultStoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("replace cancelled before commit")]
    Cancelled,
}

/// Trim `query` and check it is non-blank and within [`MAX_QUERY_CHARS`].
///
/// # Errors
///
/// Returns [`ResultStoreError::InvalidInput`] when either check fails.
pub fn validate_query(query: &str) -> Result<&str, ResultStoreError> {
    let query = normalize_query(query);
    if query.is_empty() {
        return Err(ResultStoreError::InvalidInput(
            "query must not be empty".into(),
        ));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(ResultStoreError::InvalidInput(format!(
            "query exceeds {MAX_QUERY_CHARS} characters"
        )));
    }
    Ok(query)
}

fn rows_for_query(conn: &Connection, query: &str) -> Result<Vec<StoredResult>, ResultStoreError> {
    let sql = format!("{SELECT_COLUMNS} WHERE query = ?1 ORDER BY position ASC, id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![query], row_to_result)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

// ---------------------------------------------------------------------------
// Row conversion helpers
// ---------------------------------------------------------------------------

fn row_to_result(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredResult> {
    let fetched_at_utc: DateTime<Utc> = row.get(7)?;
    Ok(StoredResult {
        id: row.get(0)?,
        query: row.get(1)?,
        url: row.get(2)?,
        title: row.get(3)?,
        snippet: row.get(4)?,
        display_link: row.get(5)?,
        position: row.get(6)?,
        fetched_at_utc,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
