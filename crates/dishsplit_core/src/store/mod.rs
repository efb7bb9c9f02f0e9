//! Group persistence.
//!
//! # Responsibility
//! - Consume a raw key-value `RecordStore`.
//! - Expose group-level save/load/rename/delete on top of it.
//!
//! # Invariants
//! - Record values are JSON-encoded `GroupSnapshot`s keyed by group name.
//! - Storage failures surface as errors and never touch session state.

pub mod group_store;
pub mod record_store;
