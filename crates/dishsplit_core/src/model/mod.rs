//! Domain model for one bill-splitting group.
//!
//! # Responsibility
//! - Define people, dishes and the persisted group snapshot.
//! - Own input parsing so no raw text reaches the arithmetic.
//!
//! # Invariants
//! - Live dishes reference people by `PersonId`; snapshots by name.
//! - Every write path validates before mutating.

pub mod amount;
pub mod dish;
pub mod person;
pub mod snapshot;
