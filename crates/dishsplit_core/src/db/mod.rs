//! SQLite bootstrap backing the persistent record store.
//!
//! # Responsibility
//! - Open and configure connections.
//! - Apply schema migrations in deterministic order.
//! - Confirm the `records` table is present before a store uses it.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No record is read or written before migrations succeed.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Table holding one JSON group snapshot per key.
pub const RECORDS_TABLE: &str = "records";

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or checking the group database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a newer build whose schema this build cannot read.
    SchemaTooNew { found: u32, supported: u32 },
    /// Connection was not bootstrapped through `open_db`.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "group database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "group database uses schema {found}; this build reads up to {supported}"
            ),
            Self::MissingTable(table) => write!(
                f,
                "group database has no `{table}` table; open it with open_db"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Fails with `MissingTable` unless the connection carries the `records` table.
pub fn ensure_records_table(conn: &Connection) -> DbResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [RECORDS_TABLE],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(DbError::MissingTable(RECORDS_TABLE))
    }
}
