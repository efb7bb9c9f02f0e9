//! Editing session for one bill.
//!
//! # Responsibility
//! - Own roster, dish ledger, tax and in-progress sharer selection.
//! - Enforce cross-references between people and dishes.
//! - Convert to and from the persisted group snapshot.
//!
//! # Invariants
//! - A rejected operation leaves the session unchanged.
//! - Every committed dish references only people in the roster.
//! - Deleting a person never leaves a dish without sharers.

mod editing_session;

pub use editing_session::{Session, SessionError};
