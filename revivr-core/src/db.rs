use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension};

use crate::error::StoreError;
use crate::store::SlotStore;

/// Opens (or creates) the SQLite database at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// This function is the single entry point for all database connections.
/// It sets `busy_timeout` via the `Connection` method (not a PRAGMA string) so
/// the setting takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `StoreError` if the file cannot be opened, WAL configuration fails,
/// or schema DDL fails.
pub fn open_db(path: impl AsRef<Path>) -> Result<Connection, StoreError> {
    let mut db = Connection::open(path.as_ref())?;

    // WAL pragmas are connection-level and re-applied on every open.
    db.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;",
    )?;
    db.busy_timeout(Duration::from_secs(5))?;

    // Checkpoint any leftover WAL from a previous run.
    db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;

    crate::schema::migrate(&mut db)?;

    Ok(db)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// [`SlotStore`] backed by the `slots` table.
///
/// Every write is its own statement; there is no batching, so the file mirrors
/// the session after each call returns.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens the database at `path` via [`open_db`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Borrow the underlying connection (used by tests and diagnostics).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                rusqlite::params![key],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key)
             DO UPDATE SET value = excluded.value,
                           updated_at = excluded.updated_at",
            rusqlite::params![key, value, now_secs()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }
}
