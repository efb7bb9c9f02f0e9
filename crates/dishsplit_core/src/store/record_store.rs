//! Key-value record store contract and implementations.
//!
//! # Responsibility
//! - Define the raw string storage primitive the group store builds on.
//! - Provide an in-memory map and a SQLite table implementation.
//!
//! # Invariants
//! - Each single-key write is atomic.
//! - `move_record` is atomic only where the implementation says so.

use crate::db::{ensure_records_table, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RecordResult<T> = Result<T, RecordStoreError>;

/// Storage I/O failure.
#[derive(Debug)]
pub enum RecordStoreError {
    Db(DbError),
    /// Backend cannot serve the request (misconfigured, offline, ...).
    Unavailable(String),
}

impl Display for RecordStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "record store database error: {err}"),
            Self::Unavailable(reason) => write!(f, "record store unavailable: {reason}"),
        }
    }
}

impl Error for RecordStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RecordStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RecordStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw string storage keyed by string.
pub trait RecordStore {
    fn get(&self, key: &str) -> RecordResult<Option<String>>;
    /// Writes `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> RecordResult<()>;
    /// Returns whether a record was present.
    fn remove(&mut self, key: &str) -> RecordResult<bool>;
    fn list_keys(&self) -> RecordResult<Vec<String>>;

    /// Moves the value at `from` to `to`, overwriting `to`.
    ///
    /// Returns `false` when `from` is absent. The default runs
    /// get/set/remove as separate writes: a failure after `set` leaves the
    /// value under both keys.
    fn move_record(&mut self, from: &str, to: &str) -> RecordResult<bool> {
        let Some(value) = self.get(from)? else {
            return Ok(false);
        };
        self.set(to, &value)?;
        self.remove(from)?;
        Ok(true)
    }
}

/// Process-local store backed by an ordered map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRecordStore {
    records: BTreeMap<String, String>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: &str) -> RecordResult<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> RecordResult<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RecordResult<bool> {
        Ok(self.records.remove(key).is_some())
    }

    fn list_keys(&self) -> RecordResult<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }
}

/// SQLite-backed store over the `records` table.
///
/// `move_record` runs in one transaction.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    ///
    /// # Errors
    /// - `Db(DbError::MissingTable)` on an unmigrated connection.
    pub fn try_new(conn: &'conn Connection) -> RecordResult<Self> {
        ensure_records_table(conn)?;
        Ok(Self { conn })
    }
}

fn upsert(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO records (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![key, value],
    )
}

fn select_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM records WHERE key = ?1;",
        [key],
        |row| row.get(0),
    )
    .optional()
}

impl RecordStore for SqliteRecordStore<'_> {
    fn get(&self, key: &str) -> RecordResult<Option<String>> {
        Ok(select_value(self.conn, key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> RecordResult<()> {
        upsert(self.conn, key, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RecordResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }

    fn list_keys(&self) -> RecordResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM records ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys)
    }

    fn move_record(&mut self, from: &str, to: &str) -> RecordResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(value) = select_value(&tx, from)? else {
            return Ok(false);
        };
        upsert(&tx, to, &value)?;
        tx.execute("DELETE FROM records WHERE key = ?1;", [from])?;
        tx.commit()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryRecordStore, RecordStore};

    #[test]
    fn default_move_relocates_value() {
        let mut store = MemoryRecordStore::new();
        store.set("old", "{}").unwrap();

        assert!(store.move_record("old", "new").unwrap());
        assert_eq!(store.get("new").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.get("old").unwrap(), None);
        assert!(!store.move_record("missing", "other").unwrap());
    }

    #[test]
    fn remove_reports_presence() {
        let mut store = MemoryRecordStore::new();
        store.set("k", "v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert!(store.is_empty());
    }
}
