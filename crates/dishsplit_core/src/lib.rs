//! Core ledger and split engine for DishSplit.
//! This crate is the single source of truth for bill-splitting invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod session;
pub mod split;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::amount::{parse_amount, AmountError};
pub use model::dish::{Dish, DishError, DishLedger};
pub use model::person::{Person, PersonId, Roster, RosterError};
pub use model::snapshot::{DishRecord, GroupSnapshot, SnapshotError};
pub use session::{Session, SessionError};
pub use split::{compute_split, PersonTotal, SplitOptions, SplitSummary, TaxPolicy};
pub use store::group_store::{GroupResult, GroupStore, GroupStoreError, RenameRepair};
pub use store::record_store::{
    MemoryRecordStore, RecordResult, RecordStore, RecordStoreError, SqliteRecordStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
